//! Behavioural coverage for the messaging service.

use std::sync::{Arc, Mutex};

use uuid::Uuid;

use super::MessagingService;
use crate::domain::error::ErrorCode;
use crate::domain::group::MessagingGroup;
use crate::domain::ports::{ChatDispatch, ChatHistory, GroupRepository, MessageRepository};
use crate::domain::presence::{ConnectionId, PresenceRegistry, PushEvent, PushSink};
use crate::domain::user::User;
use crate::outbound::persistence::{
    InMemoryGroupRepository, InMemoryMessageRepository, InMemoryUserDirectory,
};

#[derive(Clone, Default)]
struct RecordingSink(Arc<Mutex<Vec<PushEvent>>>);

impl RecordingSink {
    fn events(&self) -> Vec<PushEvent> {
        self.0.lock().expect("sink lock").clone()
    }
}

impl PushSink for RecordingSink {
    fn deliver(&self, event: PushEvent) {
        self.0.lock().expect("sink lock").push(event);
    }
}

type Service = MessagingService<
    InMemoryUserDirectory,
    InMemoryGroupRepository,
    InMemoryMessageRepository,
    RecordingSink,
>;

struct Harness {
    directory: Arc<InMemoryUserDirectory>,
    groups: Arc<InMemoryGroupRepository>,
    messages: Arc<InMemoryMessageRepository>,
    presence: Arc<PresenceRegistry<RecordingSink>>,
    service: Service,
}

fn harness() -> Harness {
    let directory = Arc::new(InMemoryUserDirectory::new());
    let groups = Arc::new(InMemoryGroupRepository::new());
    let messages = Arc::new(InMemoryMessageRepository::new());
    let presence = Arc::new(PresenceRegistry::new());
    let service = MessagingService::new(
        Arc::clone(&directory),
        Arc::clone(&groups),
        Arc::clone(&messages),
        Arc::clone(&presence),
    );
    Harness {
        directory,
        groups,
        messages,
        presence,
        service,
    }
}

fn seed_user(harness: &Harness, handle: &str) -> User {
    let user = User::with_handle(handle).expect("valid handle");
    harness.directory.insert(user.clone());
    user
}

fn connect(harness: &Harness, user: &User) -> RecordingSink {
    let sink = RecordingSink::default();
    harness
        .presence
        .register(*user.id(), ConnectionId::fresh(), sink.clone());
    sink
}

#[tokio::test]
async fn direct_send_echoes_to_sender_and_pushes_to_recipient() {
    let harness = harness();
    let ada = seed_user(&harness, "ada");
    let grace = seed_user(&harness, "grace");
    let ada_sink = connect(&harness, &ada);
    let grace_sink = connect(&harness, &grace);

    harness
        .service
        .send_direct(&ada, "grace", "hi")
        .await
        .expect("send succeeds");

    assert_eq!(ada_sink.events().len(), 1);
    assert_eq!(grace_sink.events().len(), 1);
    match &grace_sink.events()[0] {
        PushEvent::Direct {
            sender,
            recipient,
            body,
            ..
        } => {
            assert_eq!(sender, "ada");
            assert_eq!(recipient, "grace");
            assert_eq!(body, "hi");
        }
        other => panic!("expected a direct push, got {other:?}"),
    }
}

#[tokio::test]
async fn direct_send_to_offline_recipient_is_stored_and_echoed_only() {
    let harness = harness();
    let ada = seed_user(&harness, "ada");
    let grace = seed_user(&harness, "grace");
    let ada_sink = connect(&harness, &ada);

    harness
        .service
        .send_direct(&ada, "grace", "hi")
        .await
        .expect("offline recipient is not an error");

    assert_eq!(ada_sink.events().len(), 1);

    let history = harness
        .service
        .direct_history("ada", "grace")
        .await
        .expect("history readable");
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].sender, "ada");
    assert_eq!(history[0].recipient, "grace");
    assert_eq!(history[0].body, "hi");

    // Storage is the durability story; the skipped push left no trace.
    let stored = harness
        .messages
        .direct_history(ada.id(), grace.id())
        .await
        .expect("store readable");
    assert_eq!(stored.len(), 1);
}

#[tokio::test]
async fn direct_send_to_unknown_recipient_fails_and_stores_nothing() {
    let harness = harness();
    let ada = seed_user(&harness, "ada");
    connect(&harness, &ada);

    let err = harness
        .service
        .send_direct(&ada, "ghost", "hi")
        .await
        .expect_err("unknown recipient");
    assert_eq!(err.code, ErrorCode::NotFound);

    let history = harness
        .service
        .direct_history("ada", "ada")
        .await
        .expect("history readable");
    assert!(history.is_empty());
}

#[tokio::test]
async fn group_send_fans_out_to_online_members_including_the_sender() {
    let harness = harness();
    let ada = seed_user(&harness, "ada");
    let grace = seed_user(&harness, "grace");
    let lin = seed_user(&harness, "lin");
    let outsider = seed_user(&harness, "outsider");

    let group = MessagingGroup::new(
        Uuid::new_v4(),
        "Solstice",
        vec![*ada.id(), *grace.id(), *lin.id()],
    );
    harness.groups.upsert(&group).await.expect("group stored");

    let ada_sink = connect(&harness, &ada);
    let grace_sink = connect(&harness, &grace);
    // lin is a member but offline.
    let outsider_sink = connect(&harness, &outsider);

    harness
        .service
        .send_to_group(&ada, "Solstice", "hello all")
        .await
        .expect("group send succeeds");

    assert_eq!(ada_sink.events().len(), 1);
    assert_eq!(grace_sink.events().len(), 1);
    assert!(outsider_sink.events().is_empty());
    match &grace_sink.events()[0] {
        PushEvent::Group { sender, group, body, .. } => {
            assert_eq!(sender, "ada");
            assert_eq!(group, "Solstice");
            assert_eq!(body, "hello all");
        }
        other => panic!("expected a group push, got {other:?}"),
    }
}

#[tokio::test]
async fn group_send_by_a_non_member_sender_gets_no_echo() {
    let harness = harness();
    let ada = seed_user(&harness, "ada");
    let grace = seed_user(&harness, "grace");

    let group = MessagingGroup::new(Uuid::new_v4(), "Solstice", vec![*grace.id()]);
    harness.groups.upsert(&group).await.expect("group stored");

    let ada_sink = connect(&harness, &ada);
    let grace_sink = connect(&harness, &grace);

    harness
        .service
        .send_to_group(&ada, "Solstice", "hello")
        .await
        .expect("group send succeeds");

    assert!(ada_sink.events().is_empty());
    assert_eq!(grace_sink.events().len(), 1);
}

#[tokio::test]
async fn group_send_to_unknown_group_is_not_found() {
    let harness = harness();
    let ada = seed_user(&harness, "ada");

    let err = harness
        .service
        .send_to_group(&ada, "Nowhere", "hello")
        .await
        .expect_err("unknown group");
    assert_eq!(err.code, ErrorCode::NotFound);
}

#[tokio::test]
async fn history_is_symmetric_and_ordered() {
    let harness = harness();
    let ada = seed_user(&harness, "ada");
    let grace = seed_user(&harness, "grace");

    harness
        .service
        .send_direct(&ada, "grace", "first")
        .await
        .expect("send");
    harness
        .service
        .send_direct(&grace, "ada", "second")
        .await
        .expect("send");

    let forward = harness
        .service
        .direct_history("ada", "grace")
        .await
        .expect("history readable");
    let backward = harness
        .service
        .direct_history("grace", "ada")
        .await
        .expect("history readable");

    assert_eq!(forward.len(), 2);
    assert_eq!(
        forward.iter().map(|m| m.id).collect::<Vec<_>>(),
        backward.iter().map(|m| m.id).collect::<Vec<_>>()
    );
    assert!(
        forward
            .windows(2)
            .all(|pair| pair[0].sent_at <= pair[1].sent_at)
    );
    assert_eq!(forward[0].body, "first");
    assert_eq!(forward[1].body, "second");
}

#[tokio::test]
async fn history_with_an_unknown_user_is_not_found() {
    let harness = harness();
    seed_user(&harness, "ada");

    let err = harness
        .service
        .direct_history("ada", "ghost")
        .await
        .expect_err("unknown user");
    assert_eq!(err.code, ErrorCode::NotFound);
}
