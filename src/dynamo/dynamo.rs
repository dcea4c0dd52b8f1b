use crate::candidate::Mapping;
use crate::config::AwsConfig;
use crate::dynamo::convert::{item_from_mapping, mapping_from_item, Item};
use crate::dynamo::error::TableError;
use crate::dynamo::table::Table;
use async_trait::async_trait;
use aws_credential_types::Credentials;
use aws_sdk_dynamodb::config::{BehaviorVersion, Region};
use aws_sdk_dynamodb::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use tracing::{debug, info};

/// DynamoDB implementation of the Table trait, bound to one table
#[derive(Clone)]
pub struct DynamoTable {
    client: Client,
    table: String,
}

impl DynamoTable {
    /// Create a new DynamoTable from configuration
    pub fn new(config: &AwsConfig, table: &str) -> Self {
        info!(
            "Creating DynamoTable: endpoint={:?}, region={}, table={}",
            config.endpoint,
            config.region(),
            table
        );

        let mut builder = aws_sdk_dynamodb::config::Builder::new()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(config.region().to_string()));

        if let Some((access_key, secret_key)) = config.credentials() {
            let credentials = Credentials::new(
                access_key,
                secret_key,
                None,
                None,
                "StaticCredentialsProvider",
            );
            builder = builder.credentials_provider(credentials);
        }

        if let Some(endpoint) = &config.endpoint {
            info!("Setting custom DynamoDB endpoint: {}", endpoint);
            builder = builder.endpoint_url(endpoint);
        }

        Self {
            client: Client::from_conf(builder.build()),
            table: table.to_string(),
        }
    }

    fn classify_error<E>(&self, err: SdkError<E>) -> TableError
    where
        E: ProvideErrorMetadata + std::error::Error + 'static,
    {
        let detail = DisplayErrorContext(&err).to_string();
        match err.code() {
            Some("ResourceNotFoundException") => TableError::TableNotFound(self.table.clone()),
            Some("AccessDeniedException") | Some("UnrecognizedClientException") => {
                TableError::AccessDenied(self.table.clone(), detail)
            }
            _ => match &err {
                SdkError::DispatchFailure(_) | SdkError::TimeoutError(_) => {
                    TableError::ConnectionError(detail)
                }
                _ => TableError::QueryError(detail),
            },
        }
    }
}

#[async_trait]
impl Table for DynamoTable {
    async fn put_item(&self, key: i64, item: Mapping) -> Result<(), TableError> {
        debug!("Putting item uin={} into table {}", key, self.table);

        let mut attributes = item_from_mapping(&item);
        attributes.insert("uin".to_string(), AttributeValue::N(key.to_string()));

        self.client
            .put_item()
            .table_name(&self.table)
            .set_item(Some(attributes))
            .send()
            .await
            .map_err(|e| self.classify_error(e))?;

        debug!("Successfully stored item uin={}", key);
        Ok(())
    }

    async fn scan(&self) -> Result<Vec<Mapping>, TableError> {
        debug!("Scanning table {}", self.table);

        let mut mappings = Vec::new();
        let mut start_key: Option<Item> = None;

        loop {
            let output = self
                .client
                .scan()
                .table_name(&self.table)
                .set_exclusive_start_key(start_key.take())
                .send()
                .await
                .map_err(|e| self.classify_error(e))?;

            for item in output.items() {
                mappings.push(mapping_from_item(item)?);
            }

            match output.last_evaluated_key() {
                Some(key) if !key.is_empty() => start_key = Some(key.clone()),
                _ => break,
            }
        }

        debug!("Scan of {} returned {} items", self.table, mappings.len());
        Ok(mappings)
    }

    #[cfg(test)]
    async fn get_item(&self, key: i64) -> Result<Option<Mapping>, TableError> {
        let output = self
            .client
            .get_item()
            .table_name(&self.table)
            .key("uin", AttributeValue::N(key.to_string()))
            .consistent_read(true)
            .send()
            .await
            .map_err(|e| self.classify_error(e))?;

        output.item().map(mapping_from_item).transpose()
    }

    #[cfg(test)]
    async fn delete_item(&self, key: i64) -> Result<(), TableError> {
        self.client
            .delete_item()
            .table_name(&self.table)
            .key("uin", AttributeValue::N(key.to_string()))
            .send()
            .await
            .map_err(|e| self.classify_error(e))?;
        Ok(())
    }

    #[cfg(test)]
    async fn has_table(&self) -> Result<bool, TableError> {
        match self
            .client
            .describe_table()
            .table_name(&self.table)
            .send()
            .await
        {
            Ok(_) => Ok(true),
            Err(e) => match self.classify_error(e) {
                TableError::TableNotFound(_) => Ok(false),
                other => Err(other),
            },
        }
    }

    #[cfg(test)]
    async fn create_table(&self) -> Result<(), TableError> {
        use aws_sdk_dynamodb::types::{
            AttributeDefinition, BillingMode, KeySchemaElement, KeyType, ScalarAttributeType,
        };

        info!("Creating table '{}'", self.table);

        let key_schema = KeySchemaElement::builder()
            .attribute_name("uin")
            .key_type(KeyType::Hash)
            .build()
            .map_err(|e| TableError::Other(e.into()))?;
        let attribute = AttributeDefinition::builder()
            .attribute_name("uin")
            .attribute_type(ScalarAttributeType::N)
            .build()
            .map_err(|e| TableError::Other(e.into()))?;

        match self
            .client
            .create_table()
            .table_name(&self.table)
            .key_schema(key_schema)
            .attribute_definitions(attribute)
            .billing_mode(BillingMode::PayPerRequest)
            .send()
            .await
        {
            Ok(_) => Ok(()),
            Err(e) if e.code() == Some("ResourceInUseException") => Ok(()),
            Err(e) => Err(self.classify_error(e)),
        }
    }
}
