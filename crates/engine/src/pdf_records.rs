//! Metadata of an uploaded PDF financial report.
//!
//! The file itself lives on disk, outside the store. A record is immutable:
//! it is created after a successful upload and can only be deleted.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, PdfRecordNew, ResultEngine};

pub const DEFAULT_REPORT_TYPE: &str = "financial_analysis";
pub const PDF_MIMETYPE: &str = "application/pdf";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PdfRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    /// Server generated, unique file name.
    pub filename: String,
    pub original_name: String,
    pub file_path: String,
    pub file_size: i64,
    pub mimetype: String,
    pub uploaded_at: DateTime<Utc>,
    pub report_type: String,
    pub report_period: Option<String>,
    pub total_income_minor: Option<i64>,
    pub total_expenses_minor: Option<i64>,
    pub net_amount_minor: Option<i64>,
}

impl PdfRecord {
    pub(crate) fn new(
        new: PdfRecordNew,
        user_id: Uuid,
        uploaded_at: DateTime<Utc>,
    ) -> ResultEngine<Self> {
        if new.file_size <= 0 {
            return Err(EngineError::Validation("file_size must be > 0".to_string()));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            user_id,
            filename: new.filename,
            original_name: new.original_name,
            file_path: new.file_path,
            file_size: new.file_size,
            mimetype: new.mimetype.unwrap_or_else(|| PDF_MIMETYPE.to_string()),
            uploaded_at,
            report_type: new
                .report_type
                .unwrap_or_else(|| DEFAULT_REPORT_TYPE.to_string()),
            report_period: new.report_period,
            total_income_minor: new.total_income_minor,
            total_expenses_minor: new.total_expenses_minor,
            net_amount_minor: new.net_amount_minor,
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "pdf_records")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    #[sea_orm(unique)]
    pub filename: String,
    pub original_name: String,
    pub file_path: String,
    pub file_size: i64,
    pub mimetype: String,
    pub uploaded_at: DateTimeUtc,
    pub report_type: String,
    pub report_period: Option<String>,
    pub total_income_minor: Option<i64>,
    pub total_expenses_minor: Option<i64>,
    pub net_amount_minor: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Users,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&PdfRecord> for ActiveModel {
    fn from(record: &PdfRecord) -> Self {
        Self {
            id: ActiveValue::Set(record.id.to_string()),
            user_id: ActiveValue::Set(record.user_id.to_string()),
            filename: ActiveValue::Set(record.filename.clone()),
            original_name: ActiveValue::Set(record.original_name.clone()),
            file_path: ActiveValue::Set(record.file_path.clone()),
            file_size: ActiveValue::Set(record.file_size),
            mimetype: ActiveValue::Set(record.mimetype.clone()),
            uploaded_at: ActiveValue::Set(record.uploaded_at),
            report_type: ActiveValue::Set(record.report_type.clone()),
            report_period: ActiveValue::Set(record.report_period.clone()),
            total_income_minor: ActiveValue::Set(record.total_income_minor),
            total_expenses_minor: ActiveValue::Set(record.total_expenses_minor),
            net_amount_minor: ActiveValue::Set(record.net_amount_minor),
        }
    }
}

impl TryFrom<Model> for PdfRecord {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::KeyNotFound("pdf record not exists".to_string()))?,
            user_id: Uuid::parse_str(&model.user_id)
                .map_err(|_| EngineError::KeyNotFound("user not exists".to_string()))?,
            filename: model.filename,
            original_name: model.original_name,
            file_path: model.file_path,
            file_size: model.file_size,
            mimetype: model.mimetype,
            uploaded_at: model.uploaded_at,
            report_type: model.report_type,
            report_period: model.report_period,
            total_income_minor: model.total_income_minor,
            total_expenses_minor: model.total_expenses_minor,
            net_amount_minor: model.net_amount_minor,
        })
    }
}
