use chrono::Utc;
use sea_orm::{QueryFilter, QueryOrder, TransactionTrait, prelude::*};

use crate::{
    EngineError, PdfRecord, PdfRecordNew, ResultEngine, pdf_records,
    util::{normalize_optional_text, normalize_required_text, parse_uuid},
};

use super::{Engine, with_tx};

impl Engine {
    /// Register the metadata of an already stored report file.
    pub async fn new_pdf_record(&self, cmd: PdfRecordNew) -> ResultEngine<PdfRecord> {
        let user_id = parse_uuid(&cmd.user_id, "user")?;
        let cmd = PdfRecordNew {
            filename: normalize_required_text(&cmd.filename, "filename")?,
            original_name: normalize_required_text(&cmd.original_name, "original_name")?,
            file_path: normalize_required_text(&cmd.file_path, "file_path")?,
            mimetype: normalize_optional_text(cmd.mimetype.as_deref()),
            report_type: normalize_optional_text(cmd.report_type.as_deref()),
            report_period: normalize_optional_text(cmd.report_period.as_deref()),
            ..cmd
        };
        let record = PdfRecord::new(cmd, user_id, Utc::now())?;

        with_tx!(self, |db_tx| {
            self.require_owner(&db_tx, user_id).await?;
            let taken = pdf_records::Entity::find()
                .filter(pdf_records::Column::Filename.eq(record.filename.as_str()))
                .one(&db_tx)
                .await?
                .is_some();
            if taken {
                return Err(EngineError::ExistingKey(record.filename));
            }
            pdf_records::ActiveModel::from(&record).insert(&db_tx).await?;
            Ok(record)
        })
    }

    pub async fn pdf_record(&self, record_id: &str) -> ResultEngine<PdfRecord> {
        let record_id = parse_uuid(record_id, "pdf record")?;
        with_tx!(self, |db_tx| {
            let model = self.require_pdf_record(&db_tx, record_id).await?;
            PdfRecord::try_from(model)
        })
    }

    /// List the reports of a user, newest upload first.
    pub async fn pdf_records_for_user(&self, user_id: &str) -> ResultEngine<Vec<PdfRecord>> {
        let user_id = parse_uuid(user_id, "user")?;
        let models = pdf_records::Entity::find()
            .filter(pdf_records::Column::UserId.eq(user_id.to_string()))
            .order_by_desc(pdf_records::Column::UploadedAt)
            .order_by_desc(pdf_records::Column::Id)
            .all(&self.database)
            .await?;
        models.into_iter().map(PdfRecord::try_from).collect()
    }

    /// Delete a report record and return it, so the caller can remove the
    /// file it points to.
    pub async fn delete_pdf_record(&self, record_id: &str) -> ResultEngine<PdfRecord> {
        let record_id = parse_uuid(record_id, "pdf record")?;
        with_tx!(self, |db_tx| {
            let model = self.require_pdf_record(&db_tx, record_id).await?;
            pdf_records::Entity::delete_by_id(model.id.clone())
                .exec(&db_tx)
                .await?;
            PdfRecord::try_from(model)
        })
    }
}
