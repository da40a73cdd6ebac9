//! Tooltip text helpers.

/// Greedy word wrap: keep appending words while the line stays within
/// `max_width` characters (counting the joining space).
///
/// Words are split on single spaces, so runs of spaces are preserved as
/// empty words. A single word longer than `max_width` gets its own line.
pub fn wrap_note(text: &str, max_width: usize) -> Vec<String> {
    let mut words = text.split(' ');
    let mut lines = Vec::new();
    let mut current = words.next().unwrap_or_default().to_string();
    let mut current_len = current.chars().count();

    for word in words {
        let word_len = word.chars().count();
        if current_len + word_len + 1 <= max_width {
            current.push(' ');
            current.push_str(word);
            current_len += word_len + 1;
        } else {
            lines.push(std::mem::replace(&mut current, word.to_string()));
            current_len = word_len;
        }
    }
    lines.push(current);
    lines
}

/// Tick label text: integers get thousands separators, like a d3 axis.
pub fn format_tick(value: f64) -> String {
    if value.fract() != 0.0 || value.abs() >= 1e15 {
        return format!("{value}");
    }
    #[allow(clippy::cast_possible_truncation)]
    let int = value.abs() as i64;
    let digits = int.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if value < 0.0 {
        format!("−{grouped}")
    } else {
        grouped
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_short_note_is_one_line() {
        assert_eq!(wrap_note("short note", 40), vec!["short note"]);
    }

    #[test]
    fn test_thirty_nine_chars_fit() {
        let note = "a b c d e f g h i j k l m n o p q r s t";
        assert_eq!(note.len(), 39);
        assert_eq!(wrap_note(note, 40).len(), 1);
    }

    #[test]
    fn test_long_note_wraps() {
        let note = "a b c d e f g h i j k l m n o p q r s t u v w";
        let lines = wrap_note(note, 40);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "a b c d e f g h i j k l m n o p q r s t");
        assert_eq!(lines[1], "u v w");
        assert!(lines.iter().all(|l| l.chars().count() <= 40));
    }

    #[test]
    fn test_overlong_word_gets_own_line() {
        let long = "x".repeat(50);
        let lines = wrap_note(&format!("hi {long} there"), 40);
        assert_eq!(lines, vec!["hi".to_string(), long, "there".to_string()]);
    }

    #[test]
    fn test_empty_note() {
        assert_eq!(wrap_note("", 40), vec![String::new()]);
    }

    #[test]
    fn test_format_tick() {
        assert_eq!(format_tick(0.0), "0");
        assert_eq!(format_tick(900.0), "900");
        assert_eq!(format_tick(1000.0), "1,000");
        assert_eq!(format_tick(1_234_500.0), "1,234,500");
        assert_eq!(format_tick(2.5), "2.5");
    }
}
