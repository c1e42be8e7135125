use crate::protocol::Frame;
use colored::*;

pub struct OutputFormatter;

impl OutputFormatter {
    pub fn format_response(frame: &Frame) -> String {
        match frame {
            Frame::Simple(s) => s.green().to_string(),
            Frame::Error(err) => format!("(error) {}", err.red()),
            Frame::Integer(i) => format!("(integer) {}", i.to_string().cyan()),
            Frame::Bulk(s) => Self::format_bulk(s),
            Frame::Array(arr) => Self::format_array(arr),
        }
    }

    fn format_bulk(s: &Option<String>) -> String {
        match s {
            Some(s) if s.is_empty() => "(empty string)".yellow().to_string(),
            Some(s) => s.clone(),
            None => "(nil)".red().to_string(),
        }
    }

    fn format_array(arr: &Option<Vec<Frame>>) -> String {
        let values = match arr {
            Some(values) => values,
            None => return "(nil)".red().to_string(),
        };
        if values.is_empty() {
            return "(empty array)".yellow().to_string();
        }

        let mut result = String::new();
        for (i, value) in values.iter().enumerate() {
            let rendered = match value {
                Frame::Bulk(Some(s)) => s.clone(),
                Frame::Bulk(None) => "(nil)".to_string(),
                Frame::Integer(n) => n.to_string(),
                Frame::Simple(s) => s.clone(),
                Frame::Error(e) => format!("(error) {}", e),
                // FIND replies nest [feature, distance] pairs
                Frame::Array(_) => Self::format_response(value),
            };
            result.push_str(&format!(
                "{}) {}\n",
                (i + 1).to_string().blue(),
                rendered
            ));
        }
        result.trim_end().to_string()
    }

    pub fn format_prompt(host: &str, port: u16) -> String {
        format!("{}:{}> ", host.blue(), port.to_string().blue())
    }

    pub fn format_connecting_message(host: &str, port: u16) -> String {
        format!(
            "Connecting to {}:{}...",
            host.cyan(),
            port.to_string().cyan()
        )
    }

    pub fn format_connected_message(host: &str, port: u16) -> String {
        format!(
            "Connected to {}:{}",
            host.green(),
            port.to_string().green()
        )
    }

    pub fn format_disconnected_message() -> String {
        "Disconnected".red().to_string()
    }

    pub fn format_help_message() -> String {
        let help = r#"
Available commands:
  PING [message]                           - Test server connection
  INFO                                     - Dataset and index statistics
  FIND POINT lat lon COUNT k [UNIT u]      - k nearest stores to a point
                                             (u is miles or km)
  QUIT                                     - Close connection and exit
  HELP                                     - Show this help message

Example:
  FIND POINT 34.098942 -118.323040 COUNT 10 UNIT miles

Use Ctrl+C or Ctrl+D to exit interactive mode.
"#;
        help.trim().to_string()
    }
}
