mod helpers;

use chime_sdk::{
    APIError, ChimeSDK, CreateReminderInput, CreateUserInput, CustomRepeatBody,
    NotificationChannel, ReminderKind, ReminderStatus, RepeatFrequency, RepeatType,
    UpdateReminderInput, UpdateReminderStatusInput, Weekday, ID,
};
use helpers::setup::spawn_app;

fn reminder_input(title: &str) -> CreateReminderInput {
    CreateReminderInput {
        title: title.into(),
        message: "Bring the slides".into(),
        kind: ReminderKind::Personal,
        fire_at: 4_102_444_800_000,
        channels: vec![NotificationChannel::Email, NotificationChannel::Sms],
        repeat: RepeatType::None,
        custom_repeat: None,
        contact_id: None,
        group_id: None,
        status: None,
    }
}

#[actix_web::main]
#[test]
async fn test_status_ok() {
    let (_, sdk) = spawn_app().await;
    assert!(sdk.status.check_health().await.is_ok());
}

#[actix_web::main]
#[test]
async fn test_create_user() {
    let (app, sdk) = spawn_app().await;
    let res = sdk
        .user
        .create(CreateUserInput {
            code: app.config.create_user_secret_code.clone(),
            username: "alice".into(),
            premium: false,
        })
        .await
        .expect("Expected to create user");
    assert_eq!(res.user.username, "alice");
    assert!(!res.user.premium);
    assert!(res.secret_api_key.starts_with("sk_"));

    let res = sdk
        .user
        .create(CreateUserInput {
            code: "wrong code".into(),
            username: "bob".into(),
            premium: false,
        })
        .await;
    assert_eq!(res.err(), Some(APIError::Unauthorized));

    let res = sdk
        .user
        .create(CreateUserInput {
            code: app.config.create_user_secret_code.clone(),
            username: "alice".into(),
            premium: false,
        })
        .await;
    assert_eq!(res.err(), Some(APIError::Conflict));
}

#[actix_web::main]
#[test]
async fn test_reminders_require_api_key() {
    let (app, sdk) = spawn_app().await;
    let res = sdk.reminder.create(reminder_input("Standup")).await;
    assert_eq!(res.err(), Some(APIError::Unauthorized));

    let stranger = ChimeSDK::new(app.address.clone(), "sk_unknown");
    let res = stranger.reminder.create(reminder_input("Standup")).await;
    assert_eq!(res.err(), Some(APIError::Unauthorized));
}

#[actix_web::main]
#[test]
async fn test_fourth_reminder_in_window_is_rejected() {
    let (app, _) = spawn_app().await;
    let alice = app.create_user("alice", false).await;

    let mut created = Vec::new();
    for i in 0..3 {
        let res = alice
            .reminder
            .create(reminder_input(&format!("Reminder {}", i)))
            .await
            .expect("Expected to create reminder");
        created.push(res.reminder);
    }
    let res = alice.reminder.create(reminder_input("One too many")).await;
    assert_eq!(res.err(), Some(APIError::TooManyRequests));

    // Earlier reminders are unaffected
    for reminder in created {
        assert!(alice.reminder.get(reminder.id).await.is_ok());
    }

    // Quotas are per identity
    let bob = app.create_user("bob", false).await;
    assert!(bob.reminder.create(reminder_input("Bob's")).await.is_ok());
}

#[actix_web::main]
#[test]
async fn test_premium_user_bypasses_quota() {
    let (app, _) = spawn_app().await;
    let premium = app.create_user("carol", true).await;

    for i in 0..10 {
        premium
            .reminder
            .create(reminder_input(&format!("Reminder {}", i)))
            .await
            .expect("Expected premium user to create reminder");
    }
}

#[actix_web::main]
#[test]
async fn test_reminder_lifecycle() {
    let (app, _) = spawn_app().await;
    let alice = app.create_user("alice", false).await;

    let mut input = reminder_input("Weekly sync");
    input.repeat = RepeatType::Custom;
    input.custom_repeat = Some(CustomRepeatBody {
        interval: 1,
        frequency: "week".into(),
        days_of_week: vec!["fri".into(), "mon".into()],
    });
    let reminder = alice
        .reminder
        .create(input)
        .await
        .expect("Expected to create reminder")
        .reminder;
    assert_eq!(reminder.status, ReminderStatus::Scheduled);
    assert_eq!(reminder.repeat, RepeatType::Custom);
    let recurrence = reminder.custom_repeat.clone().expect("Expected recurrence");
    assert_eq!(recurrence.frequency, RepeatFrequency::Week);
    assert_eq!(recurrence.days_of_week, vec![Weekday::Mon, Weekday::Fri]);

    let fetched = alice
        .reminder
        .get(reminder.id.clone())
        .await
        .expect("Expected to get reminder")
        .reminder;
    assert_eq!(fetched.title, "Weekly sync");

    let updated = alice
        .reminder
        .update(UpdateReminderInput {
            reminder_id: reminder.id.clone(),
            title: Some("Weekly retro".into()),
            channels: Some(vec![NotificationChannel::Whatsapp]),
            ..Default::default()
        })
        .await
        .expect("Expected to update reminder")
        .reminder;
    assert_eq!(updated.title, "Weekly retro");
    assert_eq!(updated.channels, vec![NotificationChannel::Whatsapp]);
    assert_eq!(updated.message, reminder.message);
    // Updating without a new custom repeat drops the current one
    assert!(updated.custom_repeat.is_none());

    let paused = alice
        .reminder
        .update_status(UpdateReminderStatusInput {
            reminder_id: reminder.id.clone(),
            status: ReminderStatus::Paused,
        })
        .await
        .expect("Expected to pause reminder")
        .reminder;
    assert_eq!(paused.status, ReminderStatus::Paused);

    // Other users can not see the reminder
    let bob = app.create_user("bob", false).await;
    assert_eq!(
        bob.reminder.get(reminder.id.clone()).await.err(),
        Some(APIError::NotFound)
    );

    assert!(alice.reminder.delete(reminder.id.clone()).await.is_ok());
    assert_eq!(
        alice.reminder.get(reminder.id).await.err(),
        Some(APIError::NotFound)
    );
}

#[actix_web::main]
#[test]
async fn test_list_own_reminders() {
    let (app, _) = spawn_app().await;
    let alice = app.create_user("alice", false).await;
    let bob = app.create_user("bob", false).await;

    let mut input = reminder_input("Later");
    input.fire_at += 1000;
    input.status = Some(ReminderStatus::Paused);
    alice
        .reminder
        .create(input)
        .await
        .expect("Expected to create reminder");
    alice
        .reminder
        .create(reminder_input("Sooner"))
        .await
        .expect("Expected to create reminder");
    bob.reminder
        .create(reminder_input("Bob's"))
        .await
        .expect("Expected to create reminder");

    let reminders = alice
        .reminder
        .list()
        .await
        .expect("Expected to list reminders")
        .reminders;
    let titles: Vec<_> = reminders.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["Sooner", "Later"]);
    assert_eq!(reminders[0].status, ReminderStatus::Scheduled);
    assert_eq!(reminders[1].status, ReminderStatus::Paused);

    let anonymous = ChimeSDK::anonymous(app.address.clone());
    assert_eq!(
        anonymous.reminder.list().await.err(),
        Some(APIError::Unauthorized)
    );
}

#[actix_web::main]
#[test]
async fn test_reminder_needs_a_valid_channel() {
    let (app, _) = spawn_app().await;
    let alice = app.create_user("alice", false).await;

    let mut input = reminder_input("Nowhere");
    input.channels = vec![];
    assert_eq!(
        alice.reminder.create(input).await.err(),
        Some(APIError::BadClientData)
    );

    let missing = ID::default();
    assert_eq!(
        alice.reminder.get(missing).await.err(),
        Some(APIError::NotFound)
    );
}
