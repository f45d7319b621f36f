pub struct MessageFormatter;

impl MessageFormatter {
    pub fn escape_html(text: &str) -> String {
        html_escape::encode_text(text).to_string()
    }

    /// clickable mention that works without a username
    pub fn user_mention(user_id: i64, first_name: &str) -> String {
        format!(
            "<a href=\"tg://user?id={}\">{}</a>",
            user_id,
            Self::escape_html(first_name)
        )
    }

    /// appends an optional notice as its own line
    pub fn with_notice(text: String, notice: Option<String>) -> String {
        match notice {
            Some(notice) => format!("{}\n{}", text, notice),
            None => text,
        }
    }
}
