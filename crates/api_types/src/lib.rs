use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Response of a successful single-item deletion.
#[derive(Debug, Serialize, Deserialize)]
pub struct Deleted {
    pub id: Uuid,
}

pub mod health {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Health {
        pub status: String,
    }
}

pub mod user {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserNew {
        pub user_name: String,
        pub email: String,
        pub password: Option<String>,
    }

    /// Partial update. Absent fields are left untouched.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct UserUpdate {
        pub user_name: Option<String>,
        pub email: Option<String>,
        pub is_blocked: Option<bool>,
    }

    /// A user as returned by the API. The password hash is never exposed.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserView {
        pub id: Uuid,
        pub user_name: String,
        pub email: String,
        pub is_blocked: bool,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct EmailQuery {
        pub email: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BlockedResponse {
        pub email: String,
        pub is_blocked: bool,
    }

    /// What a user deletion removed.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserDeleted {
        pub id: Uuid,
        pub transactions: u64,
        pub goals: u64,
        pub pdf_records: u64,
    }
}

pub mod transaction {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionNew {
        pub user_id: String,
        /// RFC3339 timestamp.
        pub transaction_date: DateTime<Utc>,
        pub is_expense: bool,
        /// Must be > 0.
        pub amount_minor: i64,
        pub description: String,
        /// Defaults to `Other`.
        pub category: Option<String>,
        pub merchant: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionView {
        pub id: Uuid,
        pub user_id: Uuid,
        pub transaction_date: DateTime<Utc>,
        pub is_expense: bool,
        pub amount_minor: i64,
        pub description: String,
        pub category: String,
        pub merchant: Option<String>,
    }
}

pub mod goal {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GoalNew {
        pub user_id: String,
        pub title: String,
        pub target_amount_minor: i64,
        pub current_amount_minor: Option<i64>,
        /// `YYYY-MM-DD`.
        pub start_date: NaiveDate,
        /// `YYYY-MM-DD`, not before `start_date`.
        pub end_date: NaiveDate,
        pub description: Option<String>,
    }

    /// Body of deposit and withdraw requests.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct GoalAmount {
        pub amount_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GoalView {
        pub id: Uuid,
        pub user_id: Uuid,
        pub title: String,
        pub target_amount_minor: i64,
        pub current_amount_minor: i64,
        pub start_date: NaiveDate,
        pub end_date: NaiveDate,
        pub description: String,
        pub created_at: DateTime<Utc>,
        pub reached: bool,
    }
}

pub mod pdf {
    use super::*;

    /// Optional financial summary sent along with a report.
    #[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct FinancialData {
        pub total_income_minor: Option<i64>,
        pub total_expenses_minor: Option<i64>,
        pub net_amount_minor: Option<i64>,
    }

    /// A stored report record. The on-disk path is not exposed.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct PdfRecordView {
        pub id: Uuid,
        pub user_id: Uuid,
        pub filename: String,
        pub original_name: String,
        pub file_size: i64,
        pub mimetype: String,
        pub uploaded_at: DateTime<Utc>,
        pub report_type: String,
        pub report_period: Option<String>,
        pub financial_data: FinancialData,
        pub download_url: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UploadedFile {
        pub filename: String,
        pub original_name: String,
        pub size: u64,
        pub uploaded_at: DateTime<Utc>,
        pub download_url: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UploadResponse {
        pub file: UploadedFile,
        /// `None` when the upload carried no user id.
        pub record: Option<PdfRecordView>,
        pub financial_data: FinancialData,
    }
}
