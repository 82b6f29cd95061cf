use std::path::PathBuf;

use loan_risk_api::data::db::Database;
use loan_risk_api::data::db_storage::PredictionStore;
use loan_risk_api::features::engineer;
use loan_risk_api::models::{ApplicantRecord, Decision, NewPrediction};

fn temp_db_path(name: &str) -> PathBuf {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    std::env::temp_dir().join(format!("{}-{}-{}.db", name, std::process::id(), nanos))
}

fn prediction(income: i64) -> NewPrediction {
    NewPrediction {
        record: engineer(ApplicantRecord {
            income,
            loan_amount: 150.0,
            credit_history: 1,
            age: 30,
            gender: "Male".into(),
            married: "Yes".into(),
            education: "Graduate".into(),
            self_employed: "No".into(),
            dependents: "0".into(),
            property_area: "Urban".into(),
            loan_term: 360,
        }),
        risk_score: 0.8,
        decision: Decision::Approved,
    }
}

/// Predictions written through one connection pool survive a reopen.
#[tokio::test]
async fn predictions_survive_reopen() -> anyhow::Result<()> {
    let path = temp_db_path("predictions-reopen");
    let url = format!("sqlite://{}", path.display());

    let db = Database::new(&url, 2).await?;
    let store = PredictionStore::new(db.pool.clone());
    let first = store.append(&prediction(3000)).await?;
    let second = store.append(&prediction(4000)).await?;
    db.pool.close().await;

    let reopened = Database::new(&url, 2).await?;
    let store = PredictionStore::new(reopened.pool.clone());
    let third = store.append(&prediction(5000)).await?;
    let rows = store.recent(10).await?;
    reopened.pool.close().await;
    let _ = std::fs::remove_file(&path);

    assert!(first < second && second < third);
    let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![third, second, first]);
    assert_eq!(rows[2].income, 3000);
    Ok(())
}

/// Concurrent appends each land exactly once with distinct identities.
#[tokio::test]
async fn concurrent_appends_are_all_stored() -> anyhow::Result<()> {
    let path = temp_db_path("predictions-concurrent");
    let url = format!("sqlite://{}", path.display());
    let db = Database::new(&url, 4).await?;
    let store = PredictionStore::new(db.pool.clone());

    let mut handles = vec![];
    for i in 0..10 {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            store.append(&prediction(1000 + i)).await
        }));
    }

    let mut ids = Vec::new();
    for handle in handles {
        ids.push(handle.await?.map_err(|e| anyhow::anyhow!(e.to_string()))?);
    }
    ids.sort_unstable();
    ids.dedup();

    let count = store.count().await?;
    db.pool.close().await;
    let _ = std::fs::remove_file(&path);

    assert_eq!(ids.len(), 10);
    assert_eq!(count, 10);
    Ok(())
}
