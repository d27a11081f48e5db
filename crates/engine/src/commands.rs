//! Command structs for engine operations.
//!
//! These types group parameters for create/update operations. Ids are raw
//! strings: the engine parses and validates them.

use chrono::{DateTime, NaiveDate, Utc};

/// Create a user.
#[derive(Clone, Debug)]
pub struct UserNew {
    pub user_name: String,
    pub email: String,
    pub password: Option<String>,
}

impl UserNew {
    #[must_use]
    pub fn new(user_name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            user_name: user_name.into(),
            email: email.into(),
            password: None,
        }
    }

    #[must_use]
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }
}

/// Partial update of a user. `None` fields are left untouched.
#[derive(Clone, Debug, Default)]
pub struct UserUpdate {
    pub user_name: Option<String>,
    pub email: Option<String>,
    pub is_blocked: Option<bool>,
}

impl UserUpdate {
    #[must_use]
    pub fn user_name(mut self, user_name: impl Into<String>) -> Self {
        self.user_name = Some(user_name.into());
        self
    }

    #[must_use]
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    #[must_use]
    pub fn is_blocked(mut self, is_blocked: bool) -> Self {
        self.is_blocked = Some(is_blocked);
        self
    }
}

/// Record an income or expense for a user.
#[derive(Clone, Debug)]
pub struct TransactionNew {
    pub user_id: String,
    pub transaction_date: DateTime<Utc>,
    pub is_expense: bool,
    pub amount_minor: i64,
    pub description: String,
    pub category: Option<String>,
    pub merchant: Option<String>,
}

impl TransactionNew {
    #[must_use]
    pub fn expense(
        user_id: impl Into<String>,
        amount_minor: i64,
        description: impl Into<String>,
        transaction_date: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            transaction_date,
            is_expense: true,
            amount_minor,
            description: description.into(),
            category: None,
            merchant: None,
        }
    }

    #[must_use]
    pub fn income(
        user_id: impl Into<String>,
        amount_minor: i64,
        description: impl Into<String>,
        transaction_date: DateTime<Utc>,
    ) -> Self {
        Self {
            is_expense: false,
            ..Self::expense(user_id, amount_minor, description, transaction_date)
        }
    }

    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    #[must_use]
    pub fn merchant(mut self, merchant: impl Into<String>) -> Self {
        self.merchant = Some(merchant.into());
        self
    }
}

/// Create a savings goal.
#[derive(Clone, Debug)]
pub struct GoalNew {
    pub user_id: String,
    pub title: String,
    pub target_amount_minor: i64,
    /// Opening balance, defaults to 0.
    pub current_amount_minor: Option<i64>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub description: Option<String>,
}

impl GoalNew {
    #[must_use]
    pub fn new(
        user_id: impl Into<String>,
        title: impl Into<String>,
        target_amount_minor: i64,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            title: title.into(),
            target_amount_minor,
            current_amount_minor: None,
            start_date,
            end_date,
            description: None,
        }
    }

    #[must_use]
    pub fn current_amount_minor(mut self, amount_minor: i64) -> Self {
        self.current_amount_minor = Some(amount_minor);
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Register the metadata of a stored PDF report.
#[derive(Clone, Debug)]
pub struct PdfRecordNew {
    pub user_id: String,
    pub filename: String,
    pub original_name: String,
    pub file_path: String,
    pub file_size: i64,
    pub mimetype: Option<String>,
    pub report_type: Option<String>,
    pub report_period: Option<String>,
    pub total_income_minor: Option<i64>,
    pub total_expenses_minor: Option<i64>,
    pub net_amount_minor: Option<i64>,
}

impl PdfRecordNew {
    #[must_use]
    pub fn new(
        user_id: impl Into<String>,
        filename: impl Into<String>,
        original_name: impl Into<String>,
        file_path: impl Into<String>,
        file_size: i64,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            filename: filename.into(),
            original_name: original_name.into(),
            file_path: file_path.into(),
            file_size,
            mimetype: None,
            report_type: None,
            report_period: None,
            total_income_minor: None,
            total_expenses_minor: None,
            net_amount_minor: None,
        }
    }

    #[must_use]
    pub fn mimetype(mut self, mimetype: impl Into<String>) -> Self {
        self.mimetype = Some(mimetype.into());
        self
    }

    #[must_use]
    pub fn report_period(mut self, report_period: impl Into<String>) -> Self {
        self.report_period = Some(report_period.into());
        self
    }

    #[must_use]
    pub fn totals(
        mut self,
        total_income_minor: Option<i64>,
        total_expenses_minor: Option<i64>,
        net_amount_minor: Option<i64>,
    ) -> Self {
        self.total_income_minor = total_income_minor;
        self.total_expenses_minor = total_expenses_minor;
        self.net_amount_minor = net_amount_minor;
        self
    }
}
