//! Integration tests for the in-memory notification and activity sinks.

use crate::in_memory::helpers::{clock, runtime};
use mockable::DefaultClock;
use mondrian::board::{
    adapters::memory::{InMemoryActivityLogSink, InMemoryNotificationSink},
    domain::{
        ActivityAction, ActivityEntry, ActivityLogRecord, EntityType, Notification,
        NotificationKind, NotificationRecord, TaskId, UserId,
    },
    ports::{ActivityLogSink, NotificationSink, SinkError},
};
use rstest::rstest;
use serde_json::json;
use std::io;
use tokio::runtime::Runtime;

fn notice(target: &str, title: &str) -> Result<Notification, eyre::Report> {
    Ok(Notification {
        target_user_id: UserId::new(target)?,
        kind: NotificationKind::TaskAssigned,
        title: title.to_owned(),
        message: format!("You have been assigned to task: {title}"),
        related_entity_type: EntityType::Task,
        related_entity_id: TaskId::new(),
    })
}

#[rstest]
fn inbox_is_scoped_to_its_owner(
    runtime: io::Result<Runtime>,
    clock: DefaultClock,
) -> Result<(), eyre::Report> {
    let rt = runtime?;
    let sink = InMemoryNotificationSink::new();
    rt.block_on(sink.deliver(&NotificationRecord::new(notice("u2", "older")?, &clock)))?;
    rt.block_on(sink.deliver(&NotificationRecord::new(notice("u3", "other")?, &clock)))?;
    rt.block_on(sink.deliver(&NotificationRecord::new(notice("u2", "newer")?, &clock)))?;

    let inbox = rt.block_on(sink.list_for_user(&UserId::new("u2")?))?;
    let titles: Vec<&str> = inbox
        .iter()
        .map(|record| record.notification().title.as_str())
        .collect();

    assert_eq!(titles, vec!["newer", "older"]);
    Ok(())
}

#[rstest]
fn marking_read_requires_the_recipient(
    runtime: io::Result<Runtime>,
    clock: DefaultClock,
) -> Result<(), eyre::Report> {
    let rt = runtime?;
    let sink = InMemoryNotificationSink::new();
    let record = NotificationRecord::new(notice("u2", "mine")?, &clock);
    rt.block_on(sink.deliver(&record))?;

    let foreign = rt.block_on(sink.mark_read(record.id(), &UserId::new("u3")?));
    let owned = rt.block_on(sink.mark_read(record.id(), &UserId::new("u2")?))?;

    assert!(matches!(foreign, Err(SinkError::NotificationNotFound(id)) if id == record.id()));
    assert!(owned.is_read());
    assert!(
        sink.delivered()?
            .iter()
            .all(NotificationRecord::is_read)
    );
    Ok(())
}

#[rstest]
fn activity_is_listed_per_entity_in_recording_order(
    runtime: io::Result<Runtime>,
    clock: DefaultClock,
) -> Result<(), eyre::Report> {
    let rt = runtime?;
    let sink = InMemoryActivityLogSink::new();
    let task_id = TaskId::new();
    let entry = |entity_id: TaskId, action: ActivityAction| -> Result<ActivityEntry, eyre::Report> {
        Ok(ActivityEntry {
            acting_user_id: UserId::new("u1")?,
            entity_type: EntityType::Task,
            entity_id,
            action,
            changes: json!({}),
        })
    };
    for (entity_id, action) in [
        (task_id, ActivityAction::Created),
        (TaskId::new(), ActivityAction::Created),
        (task_id, ActivityAction::Updated),
    ] {
        rt.block_on(sink.record(&ActivityLogRecord::new(entry(entity_id, action)?, &clock)))?;
    }

    let history = rt.block_on(sink.list_for_entity(task_id))?;
    let actions: Vec<ActivityAction> = history.iter().map(|record| record.entry().action).collect();

    assert_eq!(
        actions,
        vec![ActivityAction::Created, ActivityAction::Updated]
    );
    Ok(())
}
