use chrono::NaiveDate;
use sea_orm::{Database, DatabaseConnection};
use tokio::task::JoinSet;
use uuid::Uuid;

use engine::{Engine, EngineError, GoalNew, UserNew};
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

async fn engine_with_file_db() -> (Engine, std::path::PathBuf) {
    let root = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../target/test_dbs");
    std::fs::create_dir_all(&root).unwrap();

    let path = root.join(format!("goals_{}.db", Uuid::new_v4()));
    let url = format!("sqlite:{}?mode=rwc", path.display());

    let db = Database::connect(&url).await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db)
        .password_cost(4)
        .build()
        .await
        .unwrap();
    (engine, path)
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

async fn alice(engine: &Engine) -> String {
    engine
        .new_user(UserNew::new("Alice", "alice@example.com"))
        .await
        .unwrap()
        .id
        .to_string()
}

async fn vacation_goal(engine: &Engine, user_id: &str) -> String {
    engine
        .new_goal(GoalNew::new(
            user_id,
            "Vacation",
            100_000,
            date(2025, 1, 1),
            date(2025, 12, 31),
        ))
        .await
        .unwrap()
        .id
        .to_string()
}

#[tokio::test]
async fn new_goal_starts_empty_with_defaults() {
    let (engine, _db) = engine_with_db().await;
    let user_id = alice(&engine).await;

    let goal = engine
        .new_goal(GoalNew::new(
            &user_id,
            "  Vacation ",
            100_000,
            date(2025, 1, 1),
            date(2025, 12, 31),
        ))
        .await
        .unwrap();

    assert_eq!(goal.title, "Vacation");
    assert_eq!(goal.current_amount_minor, 0);
    assert_eq!(goal.description, "");
    let stored = engine.goal(&goal.id.to_string()).await.unwrap();
    assert_eq!(stored.id, goal.id);
    assert_eq!(stored.end_date, date(2025, 12, 31));
}

#[tokio::test]
async fn new_goal_rejects_invalid_input() {
    let (engine, _db) = engine_with_db().await;
    let user_id = alice(&engine).await;

    let err = engine
        .new_goal(GoalNew::new(
            &user_id,
            "Car",
            0,
            date(2025, 1, 1),
            date(2025, 2, 1),
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));

    let err = engine
        .new_goal(GoalNew::new(
            &user_id,
            "Car",
            1_000,
            date(2025, 2, 1),
            date(2025, 1, 1),
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));

    let err = engine
        .new_goal(
            GoalNew::new(&user_id, "Car", 1_000, date(2025, 1, 1), date(2025, 2, 1))
                .current_amount_minor(-1),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));

    let err = engine
        .new_goal(GoalNew::new(
            Uuid::new_v4().to_string(),
            "Car",
            1_000,
            date(2025, 1, 1),
            date(2025, 2, 1),
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
}

#[tokio::test]
async fn withdraw_never_overdraws() {
    let (engine, _db) = engine_with_db().await;
    let user_id = alice(&engine).await;
    let goal_id = vacation_goal(&engine, &user_id).await;

    let goal = engine.deposit(&goal_id, 40_000).await.unwrap();
    assert_eq!(goal.current_amount_minor, 40_000);

    let err = engine.withdraw(&goal_id, 50_000).await.unwrap_err();
    assert!(matches!(err, EngineError::InsufficientFunds(_)));
    assert_eq!(
        engine.goal(&goal_id).await.unwrap().current_amount_minor,
        40_000
    );

    let goal = engine.withdraw(&goal_id, 40_000).await.unwrap();
    assert_eq!(goal.current_amount_minor, 0);

    let err = engine.withdraw(&goal_id, 1).await.unwrap_err();
    assert!(matches!(err, EngineError::InsufficientFunds(_)));
}

#[tokio::test]
async fn deposit_then_withdraw_restores_balance() {
    let (engine, _db) = engine_with_db().await;
    let user_id = alice(&engine).await;
    let goal_id = vacation_goal(&engine, &user_id).await;
    engine.deposit(&goal_id, 12_345).await.unwrap();

    engine.deposit(&goal_id, 6_789).await.unwrap();
    let goal = engine.withdraw(&goal_id, 6_789).await.unwrap();

    assert_eq!(goal.current_amount_minor, 12_345);
}

#[tokio::test]
async fn deposit_may_exceed_target() {
    let (engine, _db) = engine_with_db().await;
    let user_id = alice(&engine).await;
    let goal_id = vacation_goal(&engine, &user_id).await;

    let goal = engine.deposit(&goal_id, 150_000).await.unwrap();

    assert_eq!(goal.current_amount_minor, 150_000);
    assert!(goal.is_reached());
}

#[tokio::test]
async fn non_positive_amounts_are_rejected() {
    let (engine, _db) = engine_with_db().await;
    let user_id = alice(&engine).await;
    let goal_id = vacation_goal(&engine, &user_id).await;
    engine.deposit(&goal_id, 1_000).await.unwrap();

    for amount in [0, -500] {
        let err = engine.deposit(&goal_id, amount).await.unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
        let err = engine.withdraw(&goal_id, amount).await.unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
    }
    assert_eq!(
        engine.goal(&goal_id).await.unwrap().current_amount_minor,
        1_000
    );
}

#[tokio::test]
async fn deposit_overflow_is_rejected() {
    let (engine, _db) = engine_with_db().await;
    let user_id = alice(&engine).await;
    let goal_id = vacation_goal(&engine, &user_id).await;
    engine.deposit(&goal_id, i64::MAX - 10).await.unwrap();

    let err = engine.deposit(&goal_id, 11).await.unwrap_err();

    assert!(matches!(err, EngineError::Validation(_)));
    assert_eq!(
        engine.goal(&goal_id).await.unwrap().current_amount_minor,
        i64::MAX - 10
    );
}

#[tokio::test]
async fn balance_changes_on_missing_goal_are_not_found() {
    let (engine, _db) = engine_with_db().await;
    let missing = Uuid::new_v4().to_string();

    let err = engine.deposit(&missing, 100).await.unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
    let err = engine.withdraw(&missing, 100).await.unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
    let err = engine.goal(&missing).await.unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}

#[tokio::test]
async fn goals_for_user_and_delete() {
    let (engine, _db) = engine_with_db().await;
    let user_id = alice(&engine).await;
    let first = vacation_goal(&engine, &user_id).await;
    let second = vacation_goal(&engine, &user_id).await;

    let goals = engine.goals_for_user(&user_id).await.unwrap();
    assert_eq!(goals.len(), 2);

    engine.delete_goal(&first).await.unwrap();
    let goals = engine.goals_for_user(&user_id).await.unwrap();
    assert_eq!(goals.len(), 1);
    assert_eq!(goals[0].id.to_string(), second);

    let err = engine.delete_goal(&first).await.unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));

    let nobody = Uuid::new_v4().to_string();
    assert!(engine.goals_for_user(&nobody).await.unwrap().is_empty());
}

#[tokio::test]
async fn concurrent_withdrawals_never_go_negative() {
    let (engine, path) = engine_with_file_db().await;
    let user_id = alice(&engine).await;
    let goal_id = vacation_goal(&engine, &user_id).await;
    engine.deposit(&goal_id, 500).await.unwrap();

    let mut tasks = JoinSet::new();
    for i in 0..30 {
        let engine = engine.clone();
        let goal_id = goal_id.clone();
        tasks.spawn(async move {
            if i % 3 == 0 {
                (true, engine.deposit(&goal_id, 100).await)
            } else {
                (false, engine.withdraw(&goal_id, 100).await)
            }
        });
    }

    let mut deposits = 0;
    let mut withdrawals = 0;
    while let Some(joined) = tasks.join_next().await {
        match joined.unwrap() {
            (true, Ok(_)) => deposits += 1,
            (false, Ok(_)) => withdrawals += 1,
            (_, Err(EngineError::InsufficientFunds(_))) => {}
            (_, Err(err)) => panic!("unexpected error: {err}"),
        }
    }

    assert_eq!(deposits, 10);
    let goal = engine.goal(&goal_id).await.unwrap();
    assert!(goal.current_amount_minor >= 0);
    assert_eq!(
        goal.current_amount_minor,
        500 + 100 * deposits - 100 * withdrawals
    );

    drop(engine);
    let _ = std::fs::remove_file(path);
}
