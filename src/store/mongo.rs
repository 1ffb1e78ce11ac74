use futures::TryStreamExt;
use mongodb::bson::{Document, doc};
use mongodb::{Client, Collection, Database};
use tracing::debug;

use super::{StoreError, StudentStore};
use crate::students::{Student, StudentFilter, StudentId, StudentPatch, StudentSummary};

/// Student collection in a MongoDB database.
///
/// The client pools connections internally; clone this freely. No indexes or
/// schema are created; the collection appears on first insert.
#[derive(Clone, Debug)]
pub struct MongoStore {
    database: Database,
    students: Collection<Student>,
}

impl MongoStore {
    /// Builds a client for `url`. The driver connects lazily, so this only
    /// fails on a malformed connection string.
    pub async fn connect(url: &str, database: &str, collection: &str) -> Result<Self, StoreError> {
        let client = Client::with_uri_str(url).await?;
        let database = client.database(database);
        let students = database.collection::<Student>(collection);
        debug!(database = database.name(), collection, "mongo client ready");
        Ok(Self { database, students })
    }
}

fn by_id(id: &StudentId) -> Document {
    doc! { "_id": id.as_object_id() }
}

/// Translates list filters into a MongoDB query document.
pub(crate) fn filter_document(filter: &StudentFilter) -> Document {
    let mut query = Document::new();
    if let Some(country) = &filter.country {
        query.insert("address.country", country.as_str());
    }
    if let Some(min_age) = filter.min_age {
        query.insert("age", doc! { "$gte": min_age });
    }
    query
}

/// Translates a patch into a `$set` document holding only present fields.
pub(crate) fn set_document(patch: StudentPatch) -> Document {
    let mut set = Document::new();
    if let Some(name) = patch.name {
        set.insert("name", name);
    }
    if let Some(age) = patch.age {
        set.insert("age", age);
    }
    if let Some(address) = patch.address {
        set.insert("address", doc! { "city": address.city, "country": address.country });
    }
    doc! { "$set": set }
}

impl StudentStore for MongoStore {
    async fn insert(&self, student: Student) -> Result<StudentId, StoreError> {
        let result = self.students.insert_one(student).await?;
        result
            .inserted_id
            .as_object_id()
            .map(StudentId::from)
            .ok_or_else(|| StoreError::UnexpectedId(result.inserted_id.to_string()))
    }

    async fn list(
        &self,
        filter: &StudentFilter,
        limit: usize,
    ) -> Result<Vec<StudentSummary>, StoreError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let cursor = self
            .students
            .clone_with_type::<StudentSummary>()
            .find(filter_document(filter))
            .projection(doc! { "_id": 0, "name": 1, "age": 1 })
            .limit(limit)
            .await?;
        let summaries: Vec<StudentSummary> = cursor.try_collect().await?;
        Ok(summaries)
    }

    async fn find(&self, id: &StudentId) -> Result<Option<Student>, StoreError> {
        Ok(self.students.find_one(by_id(id)).await?)
    }

    async fn update(&self, id: &StudentId, patch: StudentPatch) -> Result<bool, StoreError> {
        let result = self.students.update_one(by_id(id), set_document(patch)).await?;
        Ok(result.matched_count > 0)
    }

    async fn delete(&self, id: &StudentId) -> Result<bool, StoreError> {
        let result = self.students.delete_one(by_id(id)).await?;
        Ok(result.deleted_count > 0)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.database.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::students::Address;

    #[test]
    fn empty_filter_matches_everything() {
        assert!(filter_document(&StudentFilter::default()).is_empty());
    }

    #[test]
    fn filter_uses_dotted_country_and_gte_age() {
        let filter = StudentFilter { country: Some("US".into()), min_age: Some(30) };
        assert_eq!(
            filter_document(&filter),
            doc! { "address.country": "US", "age": { "$gte": 30_i64 } }
        );
    }

    #[test]
    fn set_contains_only_present_fields() {
        let patch = StudentPatch { age: Some(21), ..Default::default() };
        assert_eq!(set_document(patch), doc! { "$set": { "age": 21_i64 } });

        let patch = StudentPatch {
            name: Some("Ana".into()),
            address: Some(Address { city: "Lima".into(), country: "Peru".into() }),
            ..Default::default()
        };
        assert_eq!(
            set_document(patch),
            doc! { "$set": { "name": "Ana", "address": { "city": "Lima", "country": "Peru" } } }
        );
    }
}
