pub use commands::{GoalNew, PdfRecordNew, TransactionNew, UserNew, UserUpdate};
pub use error::EngineError;
pub use goals::Goal;
pub use money::Money;
pub use ops::{CascadeReport, Engine, EngineBuilder};
pub use password::PasswordHash;
pub use pdf_records::{DEFAULT_REPORT_TYPE, PDF_MIMETYPE, PdfRecord};
pub use transactions::{DEFAULT_CATEGORY, Transaction};
pub use users::User;

mod commands;
mod error;
mod goals;
mod money;
mod ops;
mod password;
mod pdf_records;
mod transactions;
mod users;
mod util;

type ResultEngine<T> = Result<T, EngineError>;
