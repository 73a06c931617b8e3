use common::{Item, Member};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::error::{AppError, Result};

#[derive(Clone, Default)]
pub struct MemberRepository {
    members: Arc<DashMap<u64, Member>>,
    login_ids: Arc<DashMap<String, u64>>,
    sequence: Arc<AtomicU64>,
}

impl MemberRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a new member, assigning its id. Login ids are unique: the id is
    /// reserved in the login id index before the member is stored.
    pub fn save(&self, mut member: Member) -> Result<Member> {
        match self.login_ids.entry(member.login_id.clone()) {
            Entry::Occupied(_) => {
                return Err(AppError::IllegalArgument(format!(
                    "login id '{}' is already taken",
                    member.login_id
                )));
            }
            Entry::Vacant(slot) => {
                member.id = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
                self.members.insert(member.id, member.clone());
                slot.insert(member.id);
            }
        }

        log::info!("Saved member {} ({})", member.id, member.login_id);
        Ok(member)
    }

    pub fn find_by_id(&self, id: u64) -> Option<Member> {
        self.members.get(&id).map(|m| m.clone())
    }

    pub fn find_by_login_id(&self, login_id: &str) -> Option<Member> {
        let id = *self.login_ids.get(login_id)?;
        self.find_by_id(id)
    }

    /// Creates a member from a plain password.
    pub fn register(&self, login_id: &str, name: &str, password: &str, cost: u32) -> Result<Member> {
        let password_hash = bcrypt::hash(password, cost)?;
        self.save(Member::new(login_id, name, password_hash))
    }

    pub fn count(&self) -> usize {
        self.members.len()
    }
}

#[derive(Clone, Default)]
pub struct ItemRepository {
    items: Arc<DashMap<u64, Item>>,
    sequence: Arc<AtomicU64>,
}

impl ItemRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn save(&self, mut item: Item) -> Item {
        item.id = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        self.items.insert(item.id, item.clone());
        item
    }

    pub fn find_by_id(&self, id: u64) -> Option<Item> {
        self.items.get(&id).map(|i| i.clone())
    }

    pub fn find_all(&self) -> Vec<Item> {
        let mut items: Vec<Item> = self.items.iter().map(|e| e.value().clone()).collect();
        items.sort_by_key(|item| item.id);
        items
    }
}
