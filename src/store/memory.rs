use tokio::sync::RwLock;

use super::{StoreError, StudentStore};
use crate::students::{Student, StudentFilter, StudentId, StudentPatch, StudentSummary};

/// In-process store. Records are kept in insertion order, which is also the
/// order `list` returns them in.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<Vec<(StudentId, Student)>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl StudentStore for MemoryStore {
    async fn insert(&self, student: Student) -> Result<StudentId, StoreError> {
        let id = StudentId::generate();
        self.records.write().await.push((id, student));
        Ok(id)
    }

    async fn list(
        &self,
        filter: &StudentFilter,
        limit: usize,
    ) -> Result<Vec<StudentSummary>, StoreError> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .filter(|(_, s)| filter.matches(s))
            .take(limit)
            .map(|(_, s)| StudentSummary::from(s))
            .collect())
    }

    async fn find(&self, id: &StudentId) -> Result<Option<Student>, StoreError> {
        let records = self.records.read().await;
        Ok(records.iter().find(|(k, _)| k == id).map(|(_, s)| s.clone()))
    }

    async fn update(&self, id: &StudentId, patch: StudentPatch) -> Result<bool, StoreError> {
        let mut records = self.records.write().await;
        match records.iter_mut().find(|(k, _)| k == id) {
            Some((_, student)) => {
                patch.apply(student);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: &StudentId) -> Result<bool, StoreError> {
        let mut records = self.records.write().await;
        match records.iter().position(|(k, _)| k == id) {
            Some(index) => {
                records.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::students::Address;

    fn student(name: &str, age: i64, country: &str) -> Student {
        Student {
            name: name.into(),
            age,
            address: Address { city: "City".into(), country: country.into() },
        }
    }

    #[tokio::test]
    async fn insert_find_update_delete() {
        let store = MemoryStore::new();
        let id = store.insert(student("Ana", 20, "Peru")).await.unwrap();
        assert_eq!(store.find(&id).await.unwrap(), Some(student("Ana", 20, "Peru")));

        let patch = StudentPatch { age: Some(21), ..Default::default() };
        assert!(store.update(&id, patch).await.unwrap());
        assert_eq!(store.find(&id).await.unwrap().unwrap().age, 21);

        assert!(store.delete(&id).await.unwrap());
        assert!(!store.delete(&id).await.unwrap());
        assert_eq!(store.find(&id).await.unwrap(), None);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn update_of_absent_record_matches_nothing() {
        let store = MemoryStore::new();
        let patch = StudentPatch { name: Some("x".into()), ..Default::default() };
        assert!(!store.update(&StudentId::generate(), patch).await.unwrap());
    }

    #[tokio::test]
    async fn list_filters_keeps_order_and_caps() {
        let store = MemoryStore::new();
        store.insert(student("a", 25, "US")).await.unwrap();
        store.insert(student("b", 30, "US")).await.unwrap();
        store.insert(student("c", 35, "Peru")).await.unwrap();
        store.insert(student("d", 40, "US")).await.unwrap();

        let filter = StudentFilter { country: Some("US".into()), min_age: Some(30) };
        let names: Vec<_> = store.list(&filter, 100).await.unwrap().into_iter().map(|s| s.name).collect();
        assert_eq!(names, ["b", "d"]);

        assert_eq!(store.list(&StudentFilter::default(), 2).await.unwrap().len(), 2);
    }
}
