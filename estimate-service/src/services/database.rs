use crate::models::{AdminRecipient, EstimateRecord};
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, DateTime as BsonDateTime},
    options::{FindOptions, IndexOptions, UpdateOptions},
    Client as MongoClient, Collection, Database, IndexModel,
};
use service_core::error::AppError;

#[derive(Clone)]
pub struct EstimateDb {
    client: MongoClient,
    db: Database,
}

impl EstimateDb {
    pub async fn connect(uri: &str, database: &str) -> Result<Self, AppError> {
        tracing::info!(uri = %uri, "Connecting to MongoDB");
        let client = MongoClient::with_uri_str(uri).await.map_err(|e| {
            tracing::error!("Failed to connect to MongoDB at {}: {}", uri, e);
            AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
        })?;
        let db = client.database(database);
        tracing::info!(database = %database, "Successfully connected to MongoDB database");
        Ok(Self { client, db })
    }

    pub async fn initialize_indexes(&self) -> Result<(), AppError> {
        tracing::info!("Creating MongoDB indexes for estimate-service");

        // Recent-first listing for staff review
        let created_index = IndexModel::builder()
            .keys(doc! { "created_utc": -1 })
            .options(
                IndexOptions::builder()
                    .name("created_utc_idx".to_string())
                    .build(),
            )
            .build();

        self.estimates()
            .create_index(created_index, None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create created_utc index: {}", e);
                AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
            })?;

        // One credential per staff role
        let role_index = IndexModel::builder()
            .keys(doc! { "role": 1 })
            .options(
                IndexOptions::builder()
                    .name("role_idx".to_string())
                    .unique(true)
                    .build(),
            )
            .build();

        self.admin_recipients()
            .create_index(role_index, None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create role index: {}", e);
                AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
            })?;

        tracing::info!("Successfully created all MongoDB indexes");
        Ok(())
    }

    pub async fn health_check(&self) -> Result<(), AppError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::error!("MongoDB health check failed: {}", e);
                AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
            })?;
        Ok(())
    }

    pub fn estimates(&self) -> Collection<EstimateRecord> {
        self.db.collection("estimates")
    }

    pub fn admin_recipients(&self) -> Collection<AdminRecipient> {
        self.db.collection("admin_recipients")
    }

    pub async fn insert_estimate(&self, record: &EstimateRecord) -> Result<ObjectId, AppError> {
        let result = self.estimates().insert_one(record, None).await.map_err(|e| {
            tracing::error!("Failed to insert estimate: {}", e);
            AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
        })?;

        result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| AppError::DatabaseError(anyhow::anyhow!("inserted _id was not an ObjectId")))
    }

    pub async fn recent_estimates(&self, limit: i64) -> Result<Vec<EstimateRecord>, AppError> {
        let find_options = FindOptions::builder()
            .sort(doc! { "created_utc": -1 })
            .limit(limit)
            .build();

        let cursor = self
            .estimates()
            .find(doc! {}, find_options)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list estimates: {}", e);
                AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
            })?;

        let records: Vec<EstimateRecord> = cursor.try_collect().await.map_err(|e| {
            tracing::error!("Failed to collect estimates: {}", e);
            AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
        })?;

        Ok(records)
    }

    pub async fn list_admin_recipients(&self) -> Result<Vec<AdminRecipient>, AppError> {
        let cursor = self
            .admin_recipients()
            .find(doc! {}, None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list admin recipients: {}", e);
                AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
            })?;

        let recipients: Vec<AdminRecipient> = cursor.try_collect().await.map_err(|e| {
            tracing::error!("Failed to collect admin recipients: {}", e);
            AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
        })?;

        Ok(recipients)
    }

    pub async fn upsert_admin_recipient(
        &self,
        role: &str,
        refresh_token: &str,
    ) -> Result<(), AppError> {
        let options = UpdateOptions::builder().upsert(true).build();

        self.admin_recipients()
            .update_one(
                doc! { "role": role },
                doc! {
                    "$set": {
                        "refresh_token": refresh_token,
                        "updated_utc": BsonDateTime::now(),
                    }
                },
                options,
            )
            .await
            .map_err(|e| {
                tracing::error!("Failed to upsert admin recipient: {}", e);
                AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
            })?;

        Ok(())
    }
}
