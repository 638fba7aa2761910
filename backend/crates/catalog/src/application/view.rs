//! Book as returned to clients: the entity plus a presigned poster link

use std::time::Duration;

use kernel::error::app_error::AppResult;

use crate::domain::entity::book::Book;
use crate::domain::storage::ObjectStorage;

#[derive(Debug, Clone)]
pub struct BookView {
    pub book: Book,
    pub poster_image_link: String,
}

impl BookView {
    pub async fn present<S: ObjectStorage>(
        storage: &S,
        book: Book,
        ttl: Duration,
    ) -> AppResult<Self> {
        let poster_image_link = storage
            .presign_get(&book.poster_image_bucket_key, ttl)
            .await?;
        Ok(Self {
            book,
            poster_image_link,
        })
    }
}
