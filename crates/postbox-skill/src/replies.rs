//! Spoken sentence catalogue. The assistant reads these verbatim, so the
//! wording is part of the skill's contract with its users.

pub const MESSAGE_SENT: &str = "Сообщение успешно отправлено";
pub const NO_NEW_MESSAGES: &str = "Для вас нет новых сообщений.";
pub const NO_SUCH_MESSAGE: &str = "Такого сообщения не существует.";
pub const NAME_TAKEN: &str = "Извините, такое имя уже занято. Попробуйте другое.";
pub const UNKNOWN_RECIPIENT: &str = "Извините, я не знаю получателя с таким именем.";

pub fn registered(username: &str) -> String {
    format!("Вы успешно зарегистрированы под именем {username}")
}

pub fn message_read(sender: &str, sent_at: &str, payload: &str) -> String {
    format!("Сообщение от {sender}, отправлено {sent_at}: {payload}")
}

pub fn new_message_count(count: usize) -> String {
    format!("Для вас {count} новых сообщений.")
}

pub fn time_greeting(hour: u32, minute: u32, rest: &str) -> String {
    format!("Точное время {hour} часов, {minute} минут. {rest}")
}
