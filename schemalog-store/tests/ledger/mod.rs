use chrono::{DateTime, Duration, TimeZone, Utc};
use futures_util::future::join_all;
use schemalog_store::{Ledger, NewMigrationRecord, StoreError};

fn at(secs: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap() + Duration::seconds(secs)
}

pub async fn test_init_idempotent(ledger: &Ledger) -> anyhow::Result<()> {
    ledger.ensure_initialized().await?;
    ledger
        .append(NewMigrationRecord::new("20240301120000", "AutoMigrated Order").applied_at(at(0)))
        .await?;

    ledger.ensure_initialized().await?;
    ledger.ensure_initialized().await?;

    let history = ledger.list_history().await?;
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].version, "20240301120000");
    assert_eq!(history[0].changes, "AutoMigrated Order");

    Ok(())
}

pub async fn test_append_assigns_ids(ledger: &Ledger) -> anyhow::Result<()> {
    let first = ledger
        .append(NewMigrationRecord::new("v1", "AutoMigrated Order").applied_at(at(0)))
        .await?;
    let second = ledger
        .append(NewMigrationRecord::new("v2", "AutoMigrated Customer").applied_at(at(1)))
        .await?;

    assert!(second.id > first.id);
    assert_eq!(first.applied_at, at(0));
    assert_eq!(second.changes, "AutoMigrated Customer");

    Ok(())
}

pub async fn test_conflict(ledger: &Ledger) -> anyhow::Result<()> {
    ledger
        .append(NewMigrationRecord::new("20240301120000", "AutoMigrated Order").applied_at(at(0)))
        .await?;

    let err = ledger
        .append(
            NewMigrationRecord::new("20240301120000", "AutoMigrated Customer").applied_at(at(0)),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, StoreError::Conflict(ref version) if version == "20240301120000"));

    let history = ledger.list_history().await?;
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].changes, "AutoMigrated Order");

    Ok(())
}

pub async fn test_history_order(ledger: &Ledger) -> anyhow::Result<()> {
    for (version, secs) in [("v2", 2), ("v1", 1), ("v3", 3)] {
        ledger
            .append(NewMigrationRecord::new(version, format!("AutoMigrated {version}")).applied_at(at(secs)))
            .await?;
    }

    let history = ledger.list_history().await?;
    let versions = history
        .iter()
        .map(|r| r.version.as_str())
        .collect::<Vec<_>>();

    assert_eq!(versions, vec!["v3", "v2", "v1"]);
    assert_eq!(history[0].applied_at, at(3));

    let latest = ledger.latest().await?.unwrap();
    assert_eq!(latest.version, "v3");

    Ok(())
}

pub async fn test_empty_history(ledger: &Ledger) -> anyhow::Result<()> {
    assert!(ledger.list_history().await?.is_empty());
    assert!(ledger.latest().await?.is_none());

    Ok(())
}

pub async fn test_concurrency(ledger: &Ledger) -> anyhow::Result<()> {
    let results = join_all(vec![
        ledger.append(NewMigrationRecord::new("c1", "AutoMigrated Order").applied_at(at(10))),
        ledger.append(NewMigrationRecord::new("c1", "AutoMigrated Customer").applied_at(at(10))),
        ledger.append(NewMigrationRecord::new("c2", "AutoMigrated Invoice").applied_at(at(11))),
    ])
    .await;

    let conflicts = results
        .iter()
        .filter(|r| matches!(r, Err(StoreError::Conflict(_))))
        .count();

    assert_eq!(conflicts, 1);
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 2);

    let history = ledger.list_history().await?;
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].version, "c2");
    assert_eq!(history[1].version, "c1");

    Ok(())
}
