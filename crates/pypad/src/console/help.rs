//! The `help` reference table.

/// Built-in commands and their descriptions, in display order.
pub const BUILTINS: &[(&str, &str)] = &[
    ("help, man", "Show this list of console commands."),
    (
        "clear, cls",
        "Clear the console output and remove every plot drawn in it.",
    ),
    ("echo <text>", "Print the given text to the console."),
    (
        "<code>",
        "Anything else is run as Python code; the value of a trailing expression is shown after <--.",
    ),
];

const COMMAND_HEADER: &str = "Command";
const DESCRIPTION_HEADER: &str = "Description";

/// Render the bordered two-column reference table.
///
/// Descriptions are wrapped to `wrap_width` columns.
#[must_use]
pub fn render_table(wrap_width: usize) -> String {
    let command_width = BUILTINS
        .iter()
        .map(|(command, _)| command.chars().count())
        .chain(std::iter::once(COMMAND_HEADER.len()))
        .max()
        .unwrap_or_default();

    let rows: Vec<(&str, Vec<String>)> = BUILTINS
        .iter()
        .map(|(command, description)| (*command, wrap(description, wrap_width)))
        .collect();

    let description_width = rows
        .iter()
        .flat_map(|(_, lines)| lines.iter().map(|line| line.chars().count()))
        .chain(std::iter::once(DESCRIPTION_HEADER.len()))
        .max()
        .unwrap_or_default();

    let border = format!(
        "+{}+{}+",
        "-".repeat(command_width + 2),
        "-".repeat(description_width + 2)
    );

    let mut out = Vec::new();
    out.push(border.clone());
    out.push(row(
        COMMAND_HEADER,
        DESCRIPTION_HEADER,
        command_width,
        description_width,
    ));
    out.push(border.clone());
    for (command, lines) in &rows {
        for (i, line) in lines.iter().enumerate() {
            let label = if i == 0 { *command } else { "" };
            out.push(row(label, line, command_width, description_width));
        }
    }
    out.push(border);

    out.join("\n")
}

fn row(command: &str, description: &str, command_width: usize, description_width: usize) -> String {
    format!("| {command:<command_width$} | {description:<description_width$} |")
}

/// Greedy word wrap. Words longer than `width` are split.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();

        while word.len() > width {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            lines.push(word.drain(..width).collect());
        }
        if word.is_empty() {
            continue;
        }

        let current_len = current.chars().count();
        if current_len > 0 && current_len + 1 + word.len() > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.extend(word);
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}
