//! DynamoDB repository implementation.
//!
//! Implements the repository traits from `moviereviews_core::storage` using DynamoDB.

use async_trait::async_trait;
use aws_sdk_dynamodb::types::ReturnValue;
use aws_sdk_dynamodb::Client;

use moviereviews_core::movies::{CastMember, Movie, MovieId, Review, UpdateReviewRequest};
use moviereviews_core::storage::{
    attributes::{movie, review},
    AccessPath, CastRepository, MovieRepository, QuerySpec, RepositoryError, Result,
    ReviewRepository, ReviewTableLayout, ReviewUpdateSpec,
};

use super::client::shared_client;
use super::conversions::{
    expression_values, item_to_cast_member, item_to_movie, item_to_review, movie_key,
    movie_to_item, review_key, review_to_item, Item,
};
use super::error::{
    map_delete_item_error, map_get_item_error, map_put_item_error, map_query_error,
    map_scan_error, map_update_item_error,
};
use crate::config::Config;

/// DynamoDB-based repository implementation.
///
/// One instance serves the review, movie and cast tables.
pub struct DynamoDbRepository {
    client: Client,
    reviews_table: String,
    movies_table: String,
    cast_table: String,
    layout: ReviewTableLayout,
}

impl DynamoDbRepository {
    /// Creates a new repository with the given DynamoDB client.
    pub fn new(client: Client, config: &Config) -> Self {
        Self {
            client,
            reviews_table: config.reviews_table.clone(),
            movies_table: config.movies_table.clone(),
            cast_table: config.cast_table.clone(),
            layout: ReviewTableLayout {
                rating_index: config.rating_index.clone(),
                reviewer_index: config.reviewer_index.clone(),
            },
        }
    }

    /// Creates a new repository on the process-wide client.
    pub async fn from_config(config: &Config) -> Self {
        let client = shared_client(config).await;
        Self::new(client, config)
    }

    /// Runs a query or scan to completion, following pagination.
    async fn fetch(&self, table: &str, spec: &QuerySpec) -> Result<Vec<Item>> {
        let values = expression_values(spec.values());
        let index_name = spec.index_name().map(str::to_string);
        let filter = spec.filter_expression();

        tracing::debug!(
            table,
            access = ?spec.access_path(),
            index = ?index_name,
            key_condition = ?spec.key_condition_expression(),
            filter = ?filter,
            "Executing DynamoDB request"
        );

        let mut items = Vec::new();
        let mut start_key: Option<Item> = None;

        loop {
            let (page, last_key) = match spec.access_path() {
                AccessPath::Query => {
                    let output = self
                        .client
                        .query()
                        .table_name(table)
                        .set_index_name(index_name.clone())
                        .set_key_condition_expression(spec.key_condition_expression())
                        .set_filter_expression(filter.clone())
                        .set_expression_attribute_values(values.clone())
                        .set_exclusive_start_key(start_key.take())
                        .send()
                        .await
                        .map_err(|e| map_query_error(e, table))?;
                    (output.items, output.last_evaluated_key)
                }
                AccessPath::Scan => {
                    let output = self
                        .client
                        .scan()
                        .table_name(table)
                        .set_index_name(index_name.clone())
                        .set_filter_expression(filter.clone())
                        .set_expression_attribute_values(values.clone())
                        .set_exclusive_start_key(start_key.take())
                        .send()
                        .await
                        .map_err(|e| map_scan_error(e, table))?;
                    (output.items, output.last_evaluated_key)
                }
            };

            items.extend(page.unwrap_or_default());
            match last_key {
                Some(key) if !key.is_empty() => start_key = Some(key),
                _ => break,
            }
        }

        Ok(items)
    }
}

fn review_id(movie_id: MovieId, reviewer_name: &str) -> String {
    format!("{movie_id}/{reviewer_name}")
}

// ============================================================================
// ReviewRepository implementation
// ============================================================================

#[async_trait]
impl ReviewRepository for DynamoDbRepository {
    fn layout(&self) -> &ReviewTableLayout {
        &self.layout
    }

    async fn query_reviews(&self, query: &QuerySpec) -> Result<Vec<Review>> {
        let items = self.fetch(&self.reviews_table, query).await?;
        items.iter().map(item_to_review).collect()
    }

    async fn get_review(&self, movie_id: MovieId, reviewer_name: &str) -> Result<Option<Review>> {
        let result = self
            .client
            .get_item()
            .table_name(&self.reviews_table)
            .set_key(Some(review_key(movie_id, reviewer_name)))
            .send()
            .await
            .map_err(|e| map_get_item_error(e, &self.reviews_table))?;

        result.item.as_ref().map(item_to_review).transpose()
    }

    async fn create_review(&self, r: &Review) -> Result<()> {
        self.client
            .put_item()
            .table_name(&self.reviews_table)
            .set_item(Some(review_to_item(r)))
            .condition_expression(format!("attribute_not_exists({})", review::MOVIE_ID))
            .send()
            .await
            .map_err(|e| {
                map_put_item_error(
                    e,
                    &self.reviews_table,
                    "Review",
                    review_id(r.movie_id, &r.reviewer_name),
                )
            })?;

        Ok(())
    }

    async fn update_review(
        &self,
        movie_id: MovieId,
        reviewer_name: &str,
        update: &UpdateReviewRequest,
    ) -> Result<Review> {
        let spec =
            ReviewUpdateSpec::new(update).map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        let output = self
            .client
            .update_item()
            .table_name(&self.reviews_table)
            .set_key(Some(review_key(movie_id, reviewer_name)))
            .update_expression(spec.update_expression())
            .condition_expression(format!("attribute_exists({})", review::MOVIE_ID))
            .set_expression_attribute_values(expression_values(spec.values()))
            .return_values(ReturnValue::AllNew)
            .send()
            .await
            .map_err(|e| {
                map_update_item_error(
                    e,
                    &self.reviews_table,
                    "Review",
                    review_id(movie_id, reviewer_name),
                )
            })?;

        let attributes = output.attributes.ok_or_else(|| {
            RepositoryError::InvalidData("UpdateItem returned no attributes".to_string())
        })?;
        item_to_review(&attributes)
    }
}

// ============================================================================
// MovieRepository implementation
// ============================================================================

#[async_trait]
impl MovieRepository for DynamoDbRepository {
    async fn get_movie(&self, id: MovieId) -> Result<Option<Movie>> {
        let result = self
            .client
            .get_item()
            .table_name(&self.movies_table)
            .set_key(Some(movie_key(id)))
            .send()
            .await
            .map_err(|e| map_get_item_error(e, &self.movies_table))?;

        result.item.as_ref().map(item_to_movie).transpose()
    }

    async fn list_movies(&self) -> Result<Vec<Movie>> {
        let spec = QuerySpec::scan()
            .build()
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;
        let items = self.fetch(&self.movies_table, &spec).await?;
        items.iter().map(item_to_movie).collect()
    }

    async fn create_movie(&self, m: &Movie) -> Result<()> {
        self.client
            .put_item()
            .table_name(&self.movies_table)
            .set_item(Some(movie_to_item(m)))
            .condition_expression(format!("attribute_not_exists({})", movie::ID))
            .send()
            .await
            .map_err(|e| map_put_item_error(e, &self.movies_table, "Movie", m.id.to_string()))?;

        Ok(())
    }

    async fn delete_movie(&self, id: MovieId) -> Result<()> {
        self.client
            .delete_item()
            .table_name(&self.movies_table)
            .set_key(Some(movie_key(id)))
            .condition_expression(format!("attribute_exists({})", movie::ID))
            .send()
            .await
            .map_err(|e| map_delete_item_error(e, &self.movies_table, "Movie", id.to_string()))?;

        Ok(())
    }
}

// ============================================================================
// CastRepository implementation
// ============================================================================

#[async_trait]
impl CastRepository for DynamoDbRepository {
    async fn query_cast(&self, query: &QuerySpec) -> Result<Vec<CastMember>> {
        let items = self.fetch(&self.cast_table, query).await?;
        items.iter().map(item_to_cast_member).collect()
    }
}
