use console::Style;

pub fn print_header(title: &str) {
    println!("\n{}", Style::new().bold().cyan().apply_to(title));
    println!("{}", Style::new().dim().apply_to("─".repeat(title.chars().count())));
}

pub fn print_success(msg: &str) {
    println!("{} {}", Style::new().green().bold().apply_to("SUCCESS:"), msg);
}

pub fn print_search_match(
    i: usize,
    file: &str,
    start_line: usize,
    end_line: usize,
    score: f32,
    content: &str,
) {
    let header = if start_line == end_line {
        format!("#{} {}:{}", i, file, start_line)
    } else {
        format!("#{} {}:{}-{}", i, file, start_line, end_line)
    };
    println!(
        "{} {}",
        Style::new().bold().blue().apply_to(header),
        Style::new().dim().apply_to(format!("(distance {:.4})", score))
    );
    println!("{}", Style::new().dim().apply_to(content.trim()));
    println!();
}

pub fn print_field(label: &str, value: impl std::fmt::Display) {
    println!("{:<16} {}", Style::new().bold().apply_to(label), value);
}
