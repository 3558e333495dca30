use colored::Colorize;
use folio::commands::{CmdMessage, MessageLevel, RecordView};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const LINE_WIDTH: usize = 100;
const DATE_WIDTH: usize = 20;

pub(super) fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}

pub(super) fn print_records(records: &[RecordView]) {
    for view in records {
        let idx_str = match view.id {
            Some(id) => format!("{:>4}. ", id),
            None => "   -. ".to_string(),
        };

        let asset = if view.asset_url.is_empty() {
            String::new()
        } else {
            format!("  {}", view.asset_url)
        };
        let date = view.date.as_deref().unwrap_or("");

        let fixed_width = idx_str.width() + DATE_WIDTH;
        let available = LINE_WIDTH.saturating_sub(fixed_width);
        let body = truncate_to_width(&format!("{}{}", view.title, asset), available);
        let padding = available.saturating_sub(body.width());

        println!(
            "{}{}{}{}",
            idx_str.yellow(),
            body,
            " ".repeat(padding),
            format!("{:>width$}", date, width = DATE_WIDTH).dimmed()
        );
    }
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    // Leave one column for the ellipsis.
    let mut result = String::new();
    let mut current_width = 0;

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_leaves_short_strings() {
        assert_eq!(truncate_to_width("Pier", 10), "Pier");
    }

    #[test]
    fn truncate_keeps_exact_fit() {
        assert_eq!(truncate_to_width("abcde", 5), "abcde");
        assert_eq!(truncate_to_width("日本", 4), "日本");
    }

    #[test]
    fn truncate_marks_cut() {
        assert_eq!(truncate_to_width("abcdefgh", 5), "abcd…");
    }

    #[test]
    fn truncate_counts_wide_characters() {
        assert_eq!(truncate_to_width("日本語テキスト", 7), "日本語…");
    }
}
