use chrono::{NaiveDate, TimeZone, Utc};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};
use uuid::Uuid;

use engine::{
    Engine, EngineError, GoalNew, PdfRecordNew, TransactionNew, UserNew, UserUpdate,
};
use migration::MigratorTrait;

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .password_cost(4)
        .build()
        .await
        .unwrap();
    (engine, db)
}

async fn count_rows(db: &DatabaseConnection, table: &str, user_id: &str) -> i64 {
    let backend = db.get_database_backend();
    let row = db
        .query_one(Statement::from_sql_and_values(
            backend,
            format!("SELECT COUNT(*) AS n FROM {table} WHERE user_id = ?"),
            vec![user_id.into()],
        ))
        .await
        .unwrap()
        .unwrap();
    row.try_get("", "n").unwrap()
}

#[tokio::test]
async fn new_user_normalizes_and_hashes() {
    let (engine, _db) = engine_with_db().await;

    let user = engine
        .new_user(UserNew::new(" Alice ", "Alice@Example.com").password("s3cret"))
        .await
        .unwrap();

    assert_eq!(user.user_name, "Alice");
    assert_eq!(user.email, "alice@example.com");
    assert!(!user.is_blocked);
    let hash = user.password.as_ref().unwrap();
    assert_ne!(hash.as_str(), "s3cret");

    assert!(
        engine
            .verify_password("alice@example.com", "s3cret")
            .await
            .unwrap()
    );
    assert!(!engine.verify_password("ALICE@example.com", "nope").await.unwrap());
}

#[tokio::test(flavor = "current_thread")]
async fn passwords_hash_concurrently_on_a_single_thread_runtime() {
    let (engine, _db) = engine_with_db().await;

    let (alice, bob) = tokio::join!(
        engine.new_user(UserNew::new("Alice", "alice@example.com").password("alice-pw")),
        engine.new_user(UserNew::new("Bob", "bob@example.com").password("bob-pw")),
    );
    alice.unwrap();
    bob.unwrap();

    let (alice_ok, bob_wrong) = tokio::join!(
        engine.verify_password("alice@example.com", "alice-pw"),
        engine.verify_password("bob@example.com", "alice-pw"),
    );
    assert!(alice_ok.unwrap());
    assert!(!bob_wrong.unwrap());
}

#[tokio::test]
async fn user_without_password_never_verifies() {
    let (engine, _db) = engine_with_db().await;
    engine
        .new_user(UserNew::new("Bob", "bob@example.com"))
        .await
        .unwrap();

    assert!(!engine.verify_password("bob@example.com", "").await.unwrap());
}

#[tokio::test]
async fn duplicate_email_is_existing_key() {
    let (engine, _db) = engine_with_db().await;
    engine
        .new_user(UserNew::new("Alice", "alice@example.com"))
        .await
        .unwrap();

    let err = engine
        .new_user(UserNew::new("Other", "ALICE@example.com"))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        EngineError::ExistingKey("alice@example.com".to_string())
    );
    assert_eq!(engine.users().await.unwrap().len(), 1);
}

#[tokio::test]
async fn invalid_user_input_is_rejected() {
    let (engine, _db) = engine_with_db().await;

    let err = engine
        .new_user(UserNew::new("  ", "a@example.com"))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));

    let err = engine
        .new_user(UserNew::new("Alice", "not-an-email"))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
}

#[tokio::test]
async fn lookups_by_id_and_email() {
    let (engine, _db) = engine_with_db().await;
    let user = engine
        .new_user(UserNew::new("Alice", "alice@example.com"))
        .await
        .unwrap();

    let by_id = engine.user(&user.id.to_string()).await.unwrap();
    assert_eq!(by_id.email, "alice@example.com");

    let by_email = engine.user_by_email("Alice@Example.com").await.unwrap();
    assert_eq!(by_email.id, user.id);

    let err = engine.user(&Uuid::new_v4().to_string()).await.unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
    let err = engine.user("not-a-uuid").await.unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
    let err = engine.user_by_email("ghost@example.com").await.unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}

#[tokio::test]
async fn update_user_changes_only_given_fields() {
    let (engine, _db) = engine_with_db().await;
    let user = engine
        .new_user(UserNew::new("Alice", "alice@example.com").password("s3cret"))
        .await
        .unwrap();
    let id = user.id.to_string();

    let updated = engine
        .update_user(&id, UserUpdate::default().user_name("Alicia"))
        .await
        .unwrap();
    assert_eq!(updated.user_name, "Alicia");
    assert_eq!(updated.email, "alice@example.com");
    assert_eq!(updated.password, user.password);
    assert!(updated.updated_at >= user.updated_at);

    let updated = engine
        .update_user(
            &id,
            UserUpdate::default()
                .email("Alicia@Example.com")
                .is_blocked(true),
        )
        .await
        .unwrap();
    assert_eq!(updated.email, "alicia@example.com");
    assert!(updated.is_blocked);
}

#[tokio::test]
async fn update_user_rejects_taken_email() {
    let (engine, _db) = engine_with_db().await;
    let alice = engine
        .new_user(UserNew::new("Alice", "alice@example.com"))
        .await
        .unwrap();
    engine
        .new_user(UserNew::new("Bob", "bob@example.com"))
        .await
        .unwrap();

    let err = engine
        .update_user(
            &alice.id.to_string(),
            UserUpdate::default().email("bob@example.com"),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::ExistingKey(_)));

    let same = engine
        .update_user(
            &alice.id.to_string(),
            UserUpdate::default().email("alice@example.com"),
        )
        .await
        .unwrap();
    assert_eq!(same.email, "alice@example.com");

    let err = engine
        .update_user(&Uuid::new_v4().to_string(), UserUpdate::default())
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}

#[tokio::test]
async fn blocked_check_follows_flag() {
    let (engine, _db) = engine_with_db().await;
    let user = engine
        .new_user(UserNew::new("Alice", "alice@example.com"))
        .await
        .unwrap();

    assert!(!engine.is_email_blocked("alice@example.com").await.unwrap());
    assert!(!engine.is_email_blocked("ghost@example.com").await.unwrap());

    engine
        .update_user(&user.id.to_string(), UserUpdate::default().is_blocked(true))
        .await
        .unwrap();
    assert!(engine.is_email_blocked("ALICE@example.com").await.unwrap());
}

#[tokio::test]
async fn delete_user_cascades_to_dependents() {
    let (engine, db) = engine_with_db().await;
    let alice = engine
        .new_user(UserNew::new("Alice", "alice@example.com"))
        .await
        .unwrap();
    let bob = engine
        .new_user(UserNew::new("Bob", "bob@example.com"))
        .await
        .unwrap();
    let alice_id = alice.id.to_string();
    let bob_id = bob.id.to_string();
    let when = Utc.with_ymd_and_hms(2025, 3, 1, 10, 0, 0).unwrap();
    let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
    let end = NaiveDate::from_ymd_opt(2025, 12, 31).unwrap();

    for i in 0..5 {
        engine
            .new_transaction(TransactionNew::expense(
                &alice_id,
                100 + i,
                "Groceries",
                when,
            ))
            .await
            .unwrap();
    }
    engine
        .new_transaction(TransactionNew::income(&bob_id, 5_000, "Salary", when))
        .await
        .unwrap();
    for title in ["Car", "House"] {
        engine
            .new_goal(GoalNew::new(&alice_id, title, 10_000, start, end))
            .await
            .unwrap();
    }
    engine
        .new_pdf_record(PdfRecordNew::new(
            &alice_id,
            "financial_report_1-a.pdf",
            "march.pdf",
            "uploads/pdfs/financial_report_1-a.pdf",
            2_048,
        ))
        .await
        .unwrap();

    let report = engine.delete_user(&alice_id).await.unwrap();

    assert_eq!(report.transactions, 5);
    assert_eq!(report.goals, 2);
    assert_eq!(report.pdf_records, 1);
    assert_eq!(report.files, vec!["uploads/pdfs/financial_report_1-a.pdf"]);

    for table in ["transactions", "goals", "pdf_records"] {
        assert_eq!(count_rows(&db, table, &alice_id).await, 0);
    }
    let err = engine.user(&alice_id).await.unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));

    assert_eq!(engine.transactions_for_user(&bob_id).await.unwrap().len(), 1);
    assert_eq!(engine.users().await.unwrap().len(), 1);
}

#[tokio::test]
async fn delete_unknown_user_is_not_found() {
    let (engine, _db) = engine_with_db().await;

    let err = engine
        .delete_user(&Uuid::new_v4().to_string())
        .await
        .unwrap_err();

    assert!(matches!(err, EngineError::KeyNotFound(_)));
}
