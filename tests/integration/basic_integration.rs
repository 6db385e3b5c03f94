/// Basic integration tests
use chrono::NaiveDate;
use productivity_quest::*;
use serde_json::{json, Value};
use tempfile::TempDir;

#[cfg(test)]
mod basic_integration_tests {
    use super::*;

    fn clock() -> FixedClock {
        FixedClock::new(
            NaiveDate::from_ymd_opt(2025, 6, 15)
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap(),
        )
    }

    fn server(plan: Plan) -> ProductivityServer {
        let mut session = Session::new(MemoryStorage::new(), clock(), plan);
        session.sign_in(UserId::from("tester")).expect("sign in");
        ProductivityServer::new(session)
    }

    #[test]
    fn test_database_persistence() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = dir.path().join("productivity.db");
        let user = UserId::from("alice");

        {
            let storage = SqliteStorage::new(db_path.clone()).expect("Failed to create storage");
            let mut session = Session::new(storage, clock(), Plan::Free);
            session.sign_in(user.clone()).expect("first sign in");

            let task = session
                .add_task(TaskDraft::new("Write report").priority(Priority::High).category("Work"))
                .unwrap()
                .unwrap();
            session.add_task(TaskDraft::new("Call mum")).unwrap();
            let habit = session.add_habit("Meditate").unwrap().unwrap();
            assert!(session.toggle_task(task));
            assert!(session.toggle_habit(habit));
            assert!(session.drain_notifications().iter().all(|n| !matches!(n, Notification::Error { .. })));
        }

        let storage = SqliteStorage::new(db_path).expect("Failed to reopen storage");
        let mut session = Session::new(storage, clock(), Plan::Free);
        session.sign_in(user).expect("second sign in");

        let state = session.state();
        assert_eq!(state.tasks.len(), 2);
        assert!(state.tasks[0].completed);
        assert_eq!(state.tasks[0].category.as_deref(), Some("Work"));
        assert_eq!(state.habits[0].streak, 1);
        assert!(state.habits[0].is_done_on(session.now().today));
        assert_eq!(state.stats.points, 35);
        assert_eq!(state.stats.tasks_completed, 1);
        assert_eq!(state.stats.habits_completed, 1);
        assert!(state.stats.badge(1).unwrap().earned);
        assert_eq!(state.stats.achievement(1).unwrap().progress, 1);
    }

    #[test]
    fn test_users_are_isolated() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = dir.path().join("productivity.db");

        let mut alice = Session::new(SqliteStorage::new(db_path.clone()).unwrap(), clock(), Plan::Free);
        alice.sign_in(UserId::from("alice")).unwrap();
        alice.add_task(TaskDraft::new("Alice only")).unwrap();

        let mut bob = Session::new(SqliteStorage::new(db_path).unwrap(), clock(), Plan::Free);
        bob.sign_in(UserId::from("bob")).unwrap();
        assert!(bob.state().tasks.is_empty());
        assert_eq!(bob.state().stats.points, 0);
    }

    #[test]
    fn test_offline_changes_stay_local() {
        let storage = MemoryStorage::new();
        let user = UserId::from("tester");
        let mut session = Session::new(storage.clone(), clock(), Plan::Free);
        session.sign_in(user.clone()).unwrap();
        let id = session.add_task(TaskDraft::new("Saved")).unwrap().unwrap();

        storage.set_offline(true);
        assert!(session.toggle_task(id));
        assert!(session.state().tasks[0].completed);
        assert_eq!(session.state().stats.points, 10);

        let errors: Vec<_> = session
            .drain_notifications()
            .into_iter()
            .filter(|n| matches!(n, Notification::Error { .. }))
            .collect();
        assert_eq!(errors.len(), 1);

        // Nothing was rolled back locally, and nothing reached the store
        storage.set_offline(false);
        assert!(!storage.list_tasks(&user).unwrap()[0].completed);
        assert_eq!(storage.load_stats(&user).unwrap().unwrap().points, 0);
    }

    #[tokio::test]
    async fn test_free_plan_task_quota() {
        let mut free = server(Plan::Free);
        for i in 0..20 {
            let args = json!({ "text": format!("Task {}", i) });
            free.call_tool("task_add", args).await.expect("within quota");
        }
        let over = free.call_tool("task_add", json!({ "text": "One too many" })).await;
        assert!(matches!(over, Err(ToolError::Quota(_))));
        assert_eq!(free.session().state().tasks.len(), 20);

        let mut pro = server(Plan::Pro);
        for i in 0..25 {
            let args = json!({ "text": format!("Task {}", i) });
            pro.call_tool("task_add", args).await.expect("pro is unlimited");
        }
        assert_eq!(pro.session().state().tasks.len(), 25);
    }

    #[tokio::test]
    async fn test_free_plan_joins_one_challenge() {
        let mut free = server(Plan::Free);

        let joined = free.call_tool("challenge_join", json!({ "id": 1 })).await.unwrap();
        assert!(joined.contains("Done."));
        assert!(free.session().state().stats.challenge(1).unwrap().joined);

        let second = free.call_tool("challenge_join", json!({ "id": 2 })).await;
        assert!(matches!(second, Err(ToolError::Quota(_))));

        let again = free.call_tool("challenge_join", json!({ "id": 1 })).await.unwrap();
        assert!(again.contains("Nothing changed."));
    }

    #[tokio::test]
    async fn test_suggestions_need_pro() {
        let mut free = server(Plan::Free);
        let gated = free.call_tool("suggest", json!({ "kind": "tasks" })).await;
        assert!(matches!(gated, Err(ToolError::Quota(_))));

        let mut pro = server(Plan::Pro);
        let ideas = pro.call_tool("suggest", json!({ "kind": "tasks" })).await.unwrap();
        assert_eq!(ideas.lines().filter(|l| l.starts_with("- ")).count(), 3);
    }

    #[tokio::test]
    async fn test_demo_dataset_over_tools() {
        let mut demo = ProductivityServer::demo(UserId::from("demo"), Plan::Pro).expect("demo server");

        let stats = demo.call_tool("stats_get", Value::Null).await.unwrap();
        assert!(stats.contains("Level 2"));

        let insight = demo.call_tool("suggest", json!({ "kind": "insight" })).await.unwrap();
        assert!(insight.starts_with("📈"));

        let tasks = demo.call_tool("task_list", json!({ "filter": "open" })).await.unwrap();
        assert!(tasks.contains("Complete project proposal"));
        assert!(!tasks.contains("Schedule team meeting"));
    }

    #[tokio::test]
    async fn test_notifications_are_appended() {
        let mut server = server(Plan::Free);
        server
            .call_tool("task_add", json!({ "text": "Write report", "priority": "high" }))
            .await
            .unwrap();

        let text = server.call_tool("task_toggle", json!({ "id": 1 })).await.unwrap();
        assert!(text.contains("🏅 Badge earned: First Step"));
        assert!(server.session_mut().drain_notifications().is_empty());
    }

    #[tokio::test]
    async fn test_failed_call_keeps_queued_notifications() {
        let mut server = server(Plan::Free);
        let id = server
            .session_mut()
            .add_task(TaskDraft::new("Quietly done"))
            .unwrap()
            .unwrap();
        server.session_mut().toggle_task(id);

        let rejected = server.call_tool("task_add", json!({ "text": "   " })).await;
        assert!(matches!(rejected, Err(ToolError::Domain(_))));

        let listed = server.call_tool("task_list", Value::Null).await.unwrap();
        assert!(listed.contains("🏅 Badge earned: First Step"));
    }

    #[tokio::test]
    async fn test_signed_out_calls_are_refused() {
        let session = Session::new(MemoryStorage::new(), clock(), Plan::Pro);
        let mut server = ProductivityServer::new(session);
        let result = server.call_tool("task_list", Value::Null).await;
        assert!(matches!(result, Err(ToolError::SignedOut)));
    }
}
