//! Fetches documents and hydrates live records.

use super::error::LoadError;
use crate::binding::{create_relationships, ClientRelationship, Record, RelationshipOptions};
use crate::model::relationship_data;
use crate::resolve::{materialize, Document, MaterializeOptions};
use crate::transport::{Request, Transport};
use futures::future::try_join_all;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Loads JSON:API documents into [`Record`]s.
///
/// Each primary resource becomes one record. Its attributes are the merged
/// record minus the relationship keys; each relationship is bound into its
/// own container by the declared [`ClientRelationship`], resolved against the
/// document's `included` resources.
#[derive(Debug)]
pub struct ResourceLoader<T> {
    transport: T,
    declarations: Vec<ClientRelationship>,
    materialize: MaterializeOptions,
}

impl<T: Transport> ResourceLoader<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            declarations: Vec::new(),
            materialize: MaterializeOptions::default(),
        }
    }

    pub fn with_declaration(mut self, declaration: ClientRelationship) -> Self {
        self.declarations.push(declaration);
        self
    }

    /// Options applied when merging each primary resource. A document's own
    /// `included` list replaces `options.included`; without one, the pool in
    /// `options` also serves relationship binding.
    pub fn with_materialize_options(mut self, options: MaterializeOptions) -> Self {
        self.materialize = options;
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// GETs `request` and hydrates the response. An empty response loads
    /// nothing.
    #[instrument(skip(self), fields(url = %request.url))]
    pub async fn load(&self, request: Request) -> Result<Vec<Arc<Record>>, LoadError> {
        match self.transport.get(request).await? {
            Some(document) => self.hydrate(document).await,
            None => {
                debug!("empty response");
                Ok(Vec::new())
            }
        }
    }

    /// Hydrates an already fetched document. Records keep document order;
    /// the first failing bind rejects the whole load.
    pub async fn hydrate(&self, document: Value) -> Result<Vec<Arc<Record>>, LoadError> {
        let Some(document) = Document::from_response(document) else {
            return Ok(Vec::new());
        };
        let included = document.included.clone().or_else(|| self.materialize.included.clone());
        let resources = document.into_resources();

        let materialize_options = MaterializeOptions {
            included: included.clone(),
            ..self.materialize.clone()
        };
        let relationship_options = RelationshipOptions {
            included,
            declarations: self.declarations.clone(),
        };

        let records = try_join_all(
            resources
                .into_iter()
                .map(|resource| hydrate_resource(resource, &materialize_options, &relationship_options)),
        )
        .await?;

        info!(records = records.len(), "document loaded");
        Ok(records)
    }
}

async fn hydrate_resource(
    resource: Value,
    materialize_options: &MaterializeOptions,
    relationship_options: &RelationshipOptions,
) -> Result<Arc<Record>, LoadError> {
    let relationships = relationship_data(&resource);
    let mut merged = materialize(resource, materialize_options);
    if let Value::Object(attributes) = &mut merged {
        for (name, _) in &relationships {
            attributes.shift_remove(name);
        }
    }

    let record = Record::from_value(merged);
    create_relationships(&record, relationships, relationship_options).await?;
    Ok(record)
}
