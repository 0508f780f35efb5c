//! Payment repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Record payments against existing projects.
//! - Provide bulk reads for earnings aggregation.
//!
//! # Invariants
//! - `add_payment` rejects payments for unknown projects.
//! - Payments are immutable once recorded; there is no update path.
//! - Rows with a non-integer, negative or missing amount, an unparseable date,
//!   an unknown status or a non-text value in a text column are reported as
//!   malformed on bulk reads.
//! - A missing date is not malformed at this layer; the row decodes with
//!   `date = None`.

use crate::model::payment::{Payment, PaymentId, PaymentStatus};
use crate::model::project::ProjectId;
use crate::model::{
    format_calendar_date, parse_calendar_date, MalformedReason, MalformedRecord, RecordKind,
    UNREADABLE_ID,
};
use crate::repo::{read_text_column, RepoError, RepoResult, Snapshot};
use log::warn;
use rusqlite::types::ValueRef;
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

const PAYMENT_SELECT_SQL: &str = "SELECT
    id,
    project_id,
    amount,
    status,
    date
FROM payments";

/// Repository interface for payment writes and reads.
pub trait PaymentRepository {
    fn add_payment(&self, payment: &Payment) -> RepoResult<PaymentId>;
    fn get_payment(&self, id: PaymentId) -> RepoResult<Option<Payment>>;
    fn list_payments(&self) -> RepoResult<Snapshot<Payment>>;
    fn list_payments_for_project(&self, project_id: ProjectId) -> RepoResult<Snapshot<Payment>>;
}

/// SQLite-backed payment repository.
pub struct SqlitePaymentRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePaymentRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn project_exists(&self, project_id: ProjectId) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM projects WHERE id = ?1);",
            [project_id.to_string()],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn query_snapshot(&self, sql: &str, bind: &[String]) -> RepoResult<Snapshot<Payment>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(rusqlite::params_from_iter(bind))?;
        let mut snapshot = Snapshot::default();

        while let Some(row) = rows.next()? {
            match decode_payment_row(row)? {
                Ok(payment) => snapshot.records.push(payment),
                Err(malformed) => {
                    warn!(
                        "event=record_skipped module=repo kind=payment status=skipped reason={}",
                        malformed.reason
                    );
                    snapshot.malformed.push(malformed);
                }
            }
        }

        Ok(snapshot)
    }
}

impl PaymentRepository for SqlitePaymentRepository<'_> {
    fn add_payment(&self, payment: &Payment) -> RepoResult<PaymentId> {
        let amount = payment.validate()?;

        if !self.project_exists(payment.project_id)? {
            return Err(RepoError::UnknownProject(payment.project_id));
        }

        self.conn.execute(
            "INSERT INTO payments (id, project_id, amount, status, date)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                payment.id.to_string(),
                payment.project_id.to_string(),
                amount,
                payment.status.as_str(),
                payment.date.map(format_calendar_date),
            ],
        )?;

        Ok(payment.id)
    }

    fn get_payment(&self, id: PaymentId) -> RepoResult<Option<Payment>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PAYMENT_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([id.to_string()])?;
        match rows.next()? {
            Some(row) => decode_payment_row(row)?
                .map(Some)
                .map_err(|malformed| RepoError::InvalidData(malformed.to_string())),
            None => Ok(None),
        }
    }

    fn list_payments(&self) -> RepoResult<Snapshot<Payment>> {
        self.query_snapshot(
            &format!("{PAYMENT_SELECT_SQL} ORDER BY date ASC, rowid ASC;"),
            &[],
        )
    }

    fn list_payments_for_project(&self, project_id: ProjectId) -> RepoResult<Snapshot<Payment>> {
        self.query_snapshot(
            &format!("{PAYMENT_SELECT_SQL} WHERE project_id = ?1 ORDER BY date ASC, rowid ASC;"),
            &[project_id.to_string()],
        )
    }
}

fn decode_payment_row(row: &Row<'_>) -> RepoResult<Result<Payment, MalformedRecord>> {
    let id_text = match read_text_column(row, "id")? {
        Ok(text) => text.unwrap_or_default(),
        Err(reason) => {
            return Ok(Err(MalformedRecord::new(
                RecordKind::Payment,
                UNREADABLE_ID,
                reason,
            )));
        }
    };
    let malformed = |reason| MalformedRecord::new(RecordKind::Payment, id_text.clone(), reason);

    let Ok(id) = Uuid::parse_str(&id_text) else {
        return Ok(Err(malformed(MalformedReason::InvalidId(id_text.clone()))));
    };

    let project_text = match read_text_column(row, "project_id")? {
        Ok(text) => text.unwrap_or_default(),
        Err(reason) => return Ok(Err(malformed(reason))),
    };
    let Ok(project_id) = Uuid::parse_str(&project_text) else {
        return Ok(Err(malformed(MalformedReason::InvalidProjectId(project_text))));
    };

    let amount = match decode_amount(row.get_ref("amount")?) {
        Ok(amount) => amount,
        Err(reason) => return Ok(Err(malformed(reason))),
    };

    let status_text = match read_text_column(row, "status")? {
        Ok(text) => text.unwrap_or_default(),
        Err(reason) => return Ok(Err(malformed(reason))),
    };
    let Some(status) = PaymentStatus::parse(&status_text) else {
        return Ok(Err(malformed(MalformedReason::UnknownStatus(status_text))));
    };

    let date = match read_text_column(row, "date")? {
        Ok(Some(text)) => match parse_calendar_date(&text) {
            Some(date) => Some(date),
            None => return Ok(Err(malformed(MalformedReason::UnparseableDate(text)))),
        },
        Ok(None) => None,
        Err(reason) => return Ok(Err(malformed(reason))),
    };

    Ok(Ok(Payment {
        id,
        project_id,
        amount,
        status,
        date,
    }))
}

fn decode_amount(value: ValueRef<'_>) -> Result<u64, MalformedReason> {
    match value {
        ValueRef::Integer(amount) => {
            u64::try_from(amount).map_err(|_| MalformedReason::InvalidAmount(amount.to_string()))
        }
        // Whole-valued reals come from legacy imports that stored `100.0`.
        ValueRef::Real(amount) if amount >= 0.0 && amount.fract() == 0.0 && amount < 9.0e18 => {
            Ok(amount as u64)
        }
        ValueRef::Real(amount) => Err(MalformedReason::InvalidAmount(amount.to_string())),
        ValueRef::Text(bytes) => Err(MalformedReason::InvalidAmount(
            String::from_utf8_lossy(bytes).into_owned(),
        )),
        ValueRef::Blob(_) => Err(MalformedReason::InvalidAmount("<blob>".to_string())),
        ValueRef::Null => Err(MalformedReason::MissingAmount),
    }
}

#[cfg(test)]
mod tests {
    use super::decode_amount;
    use crate::model::MalformedReason;
    use rusqlite::types::ValueRef;

    #[test]
    fn decode_amount_accepts_whole_non_negative_numbers() {
        assert_eq!(decode_amount(ValueRef::Integer(250)), Ok(250));
        assert_eq!(decode_amount(ValueRef::Real(100.0)), Ok(100));
    }

    #[test]
    fn decode_amount_rejects_fractional_negative_and_text() {
        assert!(matches!(
            decode_amount(ValueRef::Integer(-5)),
            Err(MalformedReason::InvalidAmount(_))
        ));
        assert!(matches!(
            decode_amount(ValueRef::Real(12.5)),
            Err(MalformedReason::InvalidAmount(_))
        ));
        assert_eq!(
            decode_amount(ValueRef::Text(b"ten")),
            Err(MalformedReason::InvalidAmount("ten".to_string()))
        );
        assert_eq!(
            decode_amount(ValueRef::Text(b"\xff1")),
            Err(MalformedReason::InvalidAmount("\u{fffd}1".to_string()))
        );
        assert_eq!(decode_amount(ValueRef::Null), Err(MalformedReason::MissingAmount));
    }
}
