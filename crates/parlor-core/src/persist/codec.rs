//! [`Persistable`] implementations for every entity type.
//!
//! One text property per attribute. Property names are wire-stable: they
//! match what already sits in the datastore and must not be renamed.

use parlor_types::activity::{Activity, ActivityKind};
use parlor_types::conversation::{Conversation, ConversationKind, Visibility};
use parlor_types::error::RecordError;
use parlor_types::group::Group;
use parlor_types::message::Message;
use parlor_types::profile::Profile;
use parlor_types::user::User;

use crate::datastore::{CREATED_AT, Record, RecordKind, SortDirection};

use super::Persistable;

impl Persistable for User {
    const KIND: RecordKind = RecordKind::User;
    const SORT: SortDirection = SortDirection::Ascending;

    fn to_record(&self) -> Record {
        Record::new(Self::KIND, self.id.to_string())
            .with("uuid", self.id.to_string())
            .with("profile_uuid", self.profile_id.to_string())
            .with("username", &self.username)
            .with("password_hash", &self.password_hash)
            .with("is_admin", self.is_admin.to_string())
            .with(CREATED_AT, self.created_at.to_rfc3339())
    }

    fn from_record(record: &Record) -> Result<Self, RecordError> {
        Ok(Self {
            id: record.uuid("uuid")?,
            profile_id: record.uuid("profile_uuid")?,
            username: record.text("username")?.to_string(),
            password_hash: record.text("password_hash")?.to_string(),
            is_admin: record.flag("is_admin")?,
            created_at: record.timestamp(CREATED_AT)?,
        })
    }
}

impl Persistable for Conversation {
    const KIND: RecordKind = RecordKind::Conversation;
    const SORT: SortDirection = SortDirection::Ascending;

    fn to_record(&self) -> Record {
        Record::new(Self::KIND, self.id.to_string())
            .with("uuid", self.id.to_string())
            .with("owner_uuid", self.owner_id.to_string())
            .with("title", &self.title)
            .with("description", &self.description)
            .with("kind", self.kind.to_string())
            .with("visibility", self.visibility.to_string())
            .with("expires_at", self.expires_at.to_rfc3339())
            .with("total_points", self.total_points.to_string())
            .with_uuid_set("members", &self.members)
            .with_uuid_set("voters", &self.voters)
            .with(CREATED_AT, self.created_at.to_rfc3339())
    }

    fn from_record(record: &Record) -> Result<Self, RecordError> {
        Ok(Self {
            id: record.uuid("uuid")?,
            owner_id: record.uuid("owner_uuid")?,
            title: record.text("title")?.to_string(),
            description: record.text("description")?.to_string(),
            kind: record.tag::<ConversationKind>("kind")?,
            visibility: record.tag::<Visibility>("visibility")?,
            expires_at: record.timestamp("expires_at")?,
            total_points: record.int("total_points")?,
            members: record.uuid_set("members")?,
            voters: record.uuid_set("voters")?,
            created_at: record.timestamp(CREATED_AT)?,
        })
    }
}

impl Persistable for Group {
    const KIND: RecordKind = RecordKind::Group;
    const SORT: SortDirection = SortDirection::Ascending;

    fn to_record(&self) -> Record {
        Record::new(Self::KIND, self.id.to_string())
            .with("uuid", self.id.to_string())
            .with("owner_uuid", self.owner_id.to_string())
            .with("title", &self.title)
            .with_uuid_set("members", &self.members)
            .with(CREATED_AT, self.created_at.to_rfc3339())
    }

    fn from_record(record: &Record) -> Result<Self, RecordError> {
        Ok(Self {
            id: record.uuid("uuid")?,
            owner_id: record.uuid("owner_uuid")?,
            title: record.text("title")?.to_string(),
            members: record.uuid_set("members")?,
            created_at: record.timestamp(CREATED_AT)?,
        })
    }
}

impl Persistable for Message {
    const KIND: RecordKind = RecordKind::Message;
    const SORT: SortDirection = SortDirection::Ascending;

    fn to_record(&self) -> Record {
        Record::new(Self::KIND, self.id.to_string())
            .with("uuid", self.id.to_string())
            .with("conv_uuid", self.conversation_id.to_string())
            .with("author_uuid", self.author_id.to_string())
            .with("content", &self.content)
            .with(CREATED_AT, self.created_at.to_rfc3339())
    }

    fn from_record(record: &Record) -> Result<Self, RecordError> {
        Ok(Self {
            id: record.uuid("uuid")?,
            conversation_id: record.uuid("conv_uuid")?,
            author_id: record.uuid("author_uuid")?,
            content: record.text("content")?.to_string(),
            created_at: record.timestamp(CREATED_AT)?,
        })
    }
}

impl Persistable for Profile {
    const KIND: RecordKind = RecordKind::Profile;
    const SORT: SortDirection = SortDirection::Ascending;

    fn to_record(&self) -> Record {
        Record::new(Self::KIND, self.id.to_string())
            .with("uuid", self.id.to_string())
            .with("bio", &self.bio)
            .with(CREATED_AT, self.created_at.to_rfc3339())
    }

    fn from_record(record: &Record) -> Result<Self, RecordError> {
        Ok(Self {
            id: record.uuid("uuid")?,
            bio: record.text("bio")?.to_string(),
            created_at: record.timestamp(CREATED_AT)?,
        })
    }
}

impl Persistable for Activity {
    const KIND: RecordKind = RecordKind::Activity;
    // The feed loads newest first.
    const SORT: SortDirection = SortDirection::Descending;

    fn to_record(&self) -> Record {
        Record::new(Self::KIND, self.id.to_string())
            .with("uuid", self.id.to_string())
            .with("activity_kind", self.kind.to_string())
            .with("owner_uuid", self.owner_id.to_string())
            .with("subject_uuid", self.subject_id.to_string())
            .with(CREATED_AT, self.created_at.to_rfc3339())
    }

    fn from_record(record: &Record) -> Result<Self, RecordError> {
        Ok(Self {
            id: record.uuid("uuid")?,
            kind: record.tag::<ActivityKind>("activity_kind")?,
            owner_id: record.uuid("owner_uuid")?,
            subject_id: record.uuid("subject_uuid")?,
            created_at: record.timestamp(CREATED_AT)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use uuid::Uuid;

    #[test]
    fn test_user_roundtrip() {
        let mut user = User::new("alice", "$argon2id$...", Uuid::now_v7());
        user.is_admin = true;
        let decoded = User::from_record(&user.to_record()).unwrap();
        assert_eq!(decoded, user);
    }

    #[test]
    fn test_conversation_roundtrip() {
        // Member and voter sets are serialized as sorted UUID arrays, so the
        // only normalization on round-trip is ordering, which BTreeSet
        // already guarantees; every field must come back equal.
        let mut conv = Conversation::new(
            Uuid::now_v7(),
            "general",
            "the default room",
            ConversationKind::Hybrid,
            Visibility::Group,
            Duration::hours(6),
        );
        conv.add_member(Uuid::now_v7());
        conv.add_member(Uuid::now_v7());
        conv.upvote(Uuid::now_v7());

        let decoded = Conversation::from_record(&conv.to_record()).unwrap();
        assert_eq!(decoded, conv);
    }

    #[test]
    fn test_group_roundtrip() {
        let mut group = Group::new(Uuid::now_v7(), "study hall");
        group.add_member(Uuid::now_v7());
        let decoded = Group::from_record(&group.to_record()).unwrap();
        assert_eq!(decoded, group);
    }

    #[test]
    fn test_message_roundtrip() {
        let msg = Message::new(Uuid::now_v7(), Uuid::now_v7(), "hello there");
        let decoded = Message::from_record(&msg.to_record()).unwrap();
        assert_eq!(decoded, msg);
    }

    #[test]
    fn test_profile_roundtrip() {
        let mut profile = Profile::new();
        profile.bio = "rustacean".to_string();
        let decoded = Profile::from_record(&profile.to_record()).unwrap();
        assert_eq!(decoded, profile);
    }

    #[test]
    fn test_activity_roundtrip() {
        let activity = Activity::new(ActivityKind::Message, Uuid::now_v7(), Uuid::now_v7());
        let decoded = Activity::from_record(&activity.to_record()).unwrap();
        assert_eq!(decoded, activity);
    }

    #[test]
    fn test_record_key_is_entity_id() {
        let msg = Message::new(Uuid::now_v7(), Uuid::now_v7(), "hi");
        assert_eq!(msg.to_record().key, msg.id.to_string());
    }

    #[test]
    fn test_malformed_enum_tag_fails_decode() {
        let conv = Conversation::new(
            Uuid::now_v7(),
            "general",
            "",
            ConversationKind::Text,
            Visibility::Public,
            Duration::hours(1),
        );
        let record = conv.to_record().with("visibility", "everyone");
        let err = Conversation::from_record(&record).unwrap_err();
        assert!(err.to_string().contains("visibility"));
    }

    #[test]
    fn test_missing_property_fails_decode() {
        let user = User::new("alice", "hash", Uuid::now_v7());
        let mut record = user.to_record();
        record.props.remove("password_hash");
        let err = User::from_record(&record).unwrap_err();
        assert!(matches!(err, RecordError::MissingProperty(_)));
    }
}
