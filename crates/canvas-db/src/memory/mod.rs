//! In-memory store implementing every repository trait
//!
//! Used by tests and local demos. Each membership transition runs under the
//! DashMap shard lock for that community, so it is atomic like the SQL version.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::RwLock;
use tracing::instrument;

use canvas_core::{
    ApprovalStatus, ArtistRanking, Artwork, ArtworkRepository, Community, CommunityRepository,
    DailyCount, DomainError, HealthProbe, Message, MessageRepository, Post, PostRepository,
    RepoResult, Role, Snowflake, TagCount, User, UserRepository,
};

#[derive(Debug, Clone)]
struct StoredUser {
    user: User,
    password_hash: String,
}

#[derive(Debug, Default)]
pub struct InMemoryStore {
    users: DashMap<Snowflake, StoredUser>,
    emails: DashMap<String, Snowflake>,
    communities: DashMap<Snowflake, Community>,
    community_names: DashMap<String, Snowflake>,
    messages: RwLock<Vec<Message>>,
    artworks: RwLock<Vec<Artwork>>,
    posts: RwLock<Vec<Post>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Apply `change` to one community while holding its entry
    fn modify_community<F>(&self, id: Snowflake, change: F) -> Option<Community>
    where
        F: FnOnce(&mut Community),
    {
        self.communities.get_mut(&id).map(|mut entry| {
            change(entry.value_mut());
            entry.value().clone()
        })
    }

    fn sorted_communities<P>(&self, keep: P) -> Vec<Community>
    where
        P: Fn(&Community) -> bool,
    {
        let mut found: Vec<Community> = self
            .communities
            .iter()
            .filter(|entry| keep(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();
        found.sort_by_key(|c| c.id);
        found
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<User>> {
        Ok(self.users.get(&id).map(|stored| stored.user.clone()))
    }

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let Some(id) = self.emails.get(email).map(|entry| *entry.value()) else {
            return Ok(None);
        };
        Ok(self.users.get(&id).map(|stored| stored.user.clone()))
    }

    async fn find_many(&self, ids: &[Snowflake]) -> RepoResult<Vec<User>> {
        Ok(ids
            .iter()
            .filter_map(|id| self.users.get(id).map(|stored| stored.user.clone()))
            .collect())
    }

    async fn email_exists(&self, email: &str) -> RepoResult<bool> {
        Ok(self.emails.contains_key(email))
    }

    #[instrument(skip(self, user, password_hash), fields(user_id = %user.id))]
    async fn create(&self, user: &User, password_hash: &str) -> RepoResult<()> {
        match self.emails.entry(user.email.clone()) {
            Entry::Occupied(_) => return Err(DomainError::EmailAlreadyExists),
            Entry::Vacant(slot) => {
                slot.insert(user.id);
            }
        }
        self.users.insert(
            user.id,
            StoredUser {
                user: user.clone(),
                password_hash: password_hash.to_string(),
            },
        );
        Ok(())
    }

    async fn get_password_hash(&self, id: Snowflake) -> RepoResult<Option<String>> {
        Ok(self.users.get(&id).map(|stored| stored.password_hash.clone()))
    }

    async fn update_password(
        &self,
        id: Snowflake,
        password_hash: &str,
        changed_at: DateTime<Utc>,
    ) -> RepoResult<()> {
        let mut stored = self
            .users
            .get_mut(&id)
            .ok_or(DomainError::UserNotFound(id))?;
        stored.password_hash = password_hash.to_string();
        stored.user.password_changed_at = Some(changed_at);
        stored.user.updated_at = Utc::now();
        Ok(())
    }

    async fn find_pending_artists(&self) -> RepoResult<Vec<User>> {
        let mut pending: Vec<User> = self
            .users
            .iter()
            .map(|entry| entry.value().user.clone())
            .filter(|u| u.role == Role::Artist && u.status == ApprovalStatus::Pending)
            .collect();
        pending.sort_by_key(|u| (u.created_at, u.id));
        Ok(pending)
    }

    async fn set_artist_status(
        &self,
        id: Snowflake,
        status: ApprovalStatus,
    ) -> RepoResult<Option<User>> {
        Ok(self.users.get_mut(&id).and_then(|mut stored| {
            if stored.user.role != Role::Artist {
                return None;
            }
            stored.user.status = status;
            stored.user.updated_at = Utc::now();
            Some(stored.user.clone())
        }))
    }

    async fn record_artwork(&self, id: Snowflake) -> RepoResult<Option<User>> {
        Ok(self.users.get_mut(&id).map(|mut stored| {
            stored.user.record_artwork();
            stored.user.clone()
        }))
    }

    async fn count_by_role(&self, role: Role) -> RepoResult<i64> {
        Ok(self.users.iter().filter(|e| e.value().user.role == role).count() as i64)
    }
}

#[async_trait]
impl CommunityRepository for InMemoryStore {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Community>> {
        Ok(self.communities.get(&id).map(|entry| entry.value().clone()))
    }

    #[instrument(skip(self, community), fields(community_id = %community.id))]
    async fn create(&self, community: &Community) -> RepoResult<()> {
        match self.community_names.entry(community.name.clone()) {
            Entry::Occupied(_) => return Err(DomainError::CommunityNameTaken),
            Entry::Vacant(slot) => {
                slot.insert(community.id);
            }
        }
        self.communities.insert(community.id, community.clone());
        Ok(())
    }

    async fn list_approved(&self, search: Option<&str>) -> RepoResult<Vec<Community>> {
        let needle = search
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);

        Ok(self.sorted_communities(|c| {
            c.is_visible()
                && needle.as_deref().is_none_or(|n| {
                    c.name.to_lowercase().contains(n) || c.description.to_lowercase().contains(n)
                })
        }))
    }

    async fn find_by_status(&self, status: ApprovalStatus) -> RepoResult<Vec<Community>> {
        Ok(self.sorted_communities(|c| c.status == status))
    }

    async fn set_status(
        &self,
        id: Snowflake,
        status: ApprovalStatus,
    ) -> RepoResult<Option<Community>> {
        Ok(self.modify_community(id, |c| c.set_status(status)))
    }

    async fn add_pending(&self, id: Snowflake, user_id: Snowflake) -> RepoResult<Option<Community>> {
        Ok(self.modify_community(id, |c| {
            c.add_pending(user_id);
        }))
    }

    async fn approve_member(
        &self,
        id: Snowflake,
        member_id: Snowflake,
    ) -> RepoResult<Option<Community>> {
        Ok(self.modify_community(id, |c| c.approve(member_id)))
    }

    async fn reject_member(
        &self,
        id: Snowflake,
        member_id: Snowflake,
    ) -> RepoResult<Option<Community>> {
        Ok(self.modify_community(id, |c| {
            c.reject(member_id);
        }))
    }

    async fn remove_member(
        &self,
        id: Snowflake,
        user_id: Snowflake,
    ) -> RepoResult<Option<Community>> {
        Ok(self.modify_community(id, |c| {
            c.remove_member(user_id);
        }))
    }

    async fn count_by_status(&self, status: ApprovalStatus) -> RepoResult<i64> {
        Ok(self
            .communities
            .iter()
            .filter(|e| e.value().status == status)
            .count() as i64)
    }

    async fn top_by_member_count(&self, limit: i64) -> RepoResult<Vec<Community>> {
        let mut approved = self.sorted_communities(Community::is_visible);
        approved.sort_by(|a, b| b.member_count.cmp(&a.member_count).then(a.id.cmp(&b.id)));
        approved.truncate(limit.clamp(1, 100) as usize);
        Ok(approved)
    }
}

#[async_trait]
impl MessageRepository for InMemoryStore {
    async fn create(&self, message: &Message) -> RepoResult<()> {
        self.messages.write().push(message.clone());
        Ok(())
    }

    async fn find_by_community(
        &self,
        community_id: Snowflake,
        after: Option<Snowflake>,
    ) -> RepoResult<Vec<Message>> {
        let mut found: Vec<Message> = self
            .messages
            .read()
            .iter()
            .filter(|m| m.community_id == community_id && after.is_none_or(|a| m.id > a))
            .cloned()
            .collect();
        found.sort_by_key(|m| (m.created_at, m.id));
        Ok(found)
    }

    async fn daily_counts_since(&self, since: DateTime<Utc>) -> RepoResult<Vec<DailyCount>> {
        let mut per_day = BTreeMap::new();
        for message in self.messages.read().iter().filter(|m| m.created_at >= since) {
            *per_day.entry(message.created_at.date_naive()).or_insert(0_i64) += 1;
        }
        Ok(per_day
            .into_iter()
            .map(|(date, count)| DailyCount { date, count })
            .collect())
    }
}

#[async_trait]
impl ArtworkRepository for InMemoryStore {
    async fn create(&self, artwork: &Artwork) -> RepoResult<()> {
        self.artworks.write().push(artwork.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Artwork>> {
        Ok(self.artworks.read().iter().find(|a| a.id == id).cloned())
    }

    async fn list_newest(&self) -> RepoResult<Vec<Artwork>> {
        let mut all = self.artworks.read().clone();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(all)
    }

    async fn count(&self) -> RepoResult<i64> {
        Ok(self.artworks.read().len() as i64)
    }

    async fn count_by_owner(&self, owner_id: Snowflake) -> RepoResult<i64> {
        Ok(self
            .artworks
            .read()
            .iter()
            .filter(|a| a.owner_id == owner_id)
            .count() as i64)
    }

    async fn top_artists(&self, limit: i64) -> RepoResult<Vec<ArtistRanking>> {
        let mut per_owner: HashMap<Snowflake, i64> = HashMap::new();
        for artwork in self.artworks.read().iter() {
            *per_owner.entry(artwork.owner_id).or_default() += 1;
        }

        let mut ranking: Vec<ArtistRanking> = per_owner
            .into_iter()
            .filter_map(|(owner, artwork_count)| {
                self.users.get(&owner).map(|stored| ArtistRanking {
                    name: stored.user.name.clone(),
                    artwork_count,
                })
            })
            .collect();
        ranking.sort_by(|a, b| b.artwork_count.cmp(&a.artwork_count).then(a.name.cmp(&b.name)));
        ranking.truncate(limit.clamp(1, 100) as usize);
        Ok(ranking)
    }

    async fn count_by_tag(&self) -> RepoResult<Vec<TagCount>> {
        let mut per_tag: HashMap<String, i64> = HashMap::new();
        for artwork in self.artworks.read().iter() {
            for tag in &artwork.tags {
                *per_tag.entry(tag.clone()).or_default() += 1;
            }
        }

        let mut counts: Vec<TagCount> = per_tag
            .into_iter()
            .map(|(name, value)| TagCount { name, value })
            .collect();
        counts.sort_by(|a, b| b.value.cmp(&a.value).then(a.name.cmp(&b.name)));
        Ok(counts)
    }
}

#[async_trait]
impl PostRepository for InMemoryStore {
    async fn create(&self, post: &Post) -> RepoResult<()> {
        self.posts.write().push(post.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Post>> {
        Ok(self.posts.read().iter().find(|p| p.id == id).cloned())
    }

    async fn list_newest(&self) -> RepoResult<Vec<Post>> {
        let mut all = self.posts.read().clone();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(all)
    }
}

#[async_trait]
impl HealthProbe for InMemoryStore {
    async fn ping(&self) -> RepoResult<()> {
        Ok(())
    }
}
