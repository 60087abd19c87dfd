//! Persona prompt construction.

/// Wrap a channel message in the persona prompt sent to Gemini.
///
/// The persona answers on behalf of `bot_name` as the group's older
/// brother: first person "anh", short and direct.
#[must_use]
pub fn build_prompt(bot_name: &str, message_text: &str) -> String {
    format!(
        "Bạn là anh trưởng nhóm, đại diện trả lời thay người dùng tên {bot_name}. \
         Xưng là \"anh\", trả lời ngắn gọn, rõ ràng, không vòng vo. \
         Câu hỏi hoặc tin nhắn: \"{message_text}\""
    )
}
