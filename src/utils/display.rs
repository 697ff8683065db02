use colored::*;

pub fn print_header(text: &str) {
    println!("\n{}", text.bright_cyan().bold());
    println!("{}", "=".repeat(text.len()).bright_cyan());
}

pub fn print_error(text: &str) {
    eprintln!("{}", text.red().bold());
}

pub fn print_tool_line(name: &str, usage: &str) {
    println!("{}  {}", name.green().bold(), usage);
}

pub fn print_field(label: &str, value: &str) {
    println!("  {} {}", format!("{}:", label).yellow().bold(), value);
}
