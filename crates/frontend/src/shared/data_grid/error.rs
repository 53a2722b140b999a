use thiserror::Error;

/// Ошибки работы таблицы с серверными данными
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    /// The backend answered with `error: true`.
    #[error("{0}")]
    Remote(String),

    #[error("Не удалось отправить запрос: {0}")]
    Transport(String),

    #[error("Ошибка сервера: HTTP {0}")]
    Status(u16),

    #[error("Не удалось разобрать ответ сервера: {0}")]
    Decode(String),

    #[error("Не удалось сформировать запрос: {0}")]
    Encode(String),

    #[error("Ошибка хранилища браузера: {0}")]
    Storage(String),

    #[error("Не удалось скачать файл: {0}")]
    Download(String),

    #[error("Некорректные настройки таблицы: {0}")]
    Config(String),
}
