use colored::Colorize;
use hostdesk_application::{Notice, NoticeLevel};

pub fn print_notice(notice: &Notice) {
    match notice.level {
        NoticeLevel::Info => println!("{} {}", notice.title.green().bold(), notice.description),
        NoticeLevel::Error => eprintln!("{} {}", notice.title.red().bold(), notice.description),
    }
}

pub fn heading(text: &str) {
    println!("{}", text.bold().underline());
}

pub fn field(label: &str, value: &str) {
    let value = if value.is_empty() { "-" } else { value };
    println!("  {:<14} {}", format!("{}:", label).dimmed(), value);
}
