use std::sync::Arc;

use mergegate_loader::RemoteSchema;
use mergegate_schema::{compose, MergeError, MergeOptions, SchemaDocument};
use serde::Serialize;
use warp::{Filter, Rejection, Reply};

#[derive(Debug, Clone, Serialize, Eq, PartialEq)]
pub struct Upstream {
    pub name: String,
    pub url: String,
}

/// The merged schema and the upstreams it was built from.
///
/// Built once from a full set of sources; reloading means building a new one.
#[derive(Debug)]
pub struct Gateway {
    schema: SchemaDocument,
    sdl: String,
    upstreams: Vec<Upstream>,
}

impl Gateway {
    pub fn new(remote_schemas: Vec<RemoteSchema>, options: &MergeOptions) -> Result<Gateway, MergeError> {
        let upstreams = remote_schemas
            .iter()
            .map(|remote| Upstream {
                name: remote.name.clone(),
                url: remote.url.clone(),
            })
            .collect();
        let schema = compose(
            remote_schemas.into_iter().map(|remote| (remote.name, remote.document)),
            options,
        )?;
        if schema.query().is_none() {
            tracing::warn!("The merged schema has no Query type.");
        }

        Ok(Gateway {
            sdl: schema.sdl(),
            schema,
            upstreams,
        })
    }

    #[inline]
    pub fn schema(&self) -> &SchemaDocument {
        &self.schema
    }

    #[inline]
    pub fn sdl(&self) -> &str {
        &self.sdl
    }

    #[inline]
    pub fn upstreams(&self) -> &[Upstream] {
        &self.upstreams
    }
}

pub fn routes(gateway: Arc<Gateway>) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let health = warp::path!("health")
        .and(warp::get())
        .map(|| warp::reply::json(&"healthy"));

    let schema = warp::path!("schema").and(warp::get()).map({
        let gateway = gateway.clone();
        move || gateway.sdl().to_string()
    });

    let services = warp::path!("services")
        .and(warp::get())
        .map(move || warp::reply::json(&gateway.upstreams()));

    health.or(schema).or(services)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn remote(name: &str, sdl: &str) -> RemoteSchema {
        RemoteSchema {
            name: name.to_string(),
            url: format!("http://{}:8080/graphql", name),
            document: SchemaDocument::parse(sdl).unwrap(),
        }
    }

    fn gateway() -> Arc<Gateway> {
        Arc::new(
            Gateway::new(
                vec![
                    remote("users", "type User { id: ID! name: String } type Query { me: User }"),
                    remote("accounts", "type User { id: ID! balance: Int }"),
                ],
                &MergeOptions::default(),
            )
            .unwrap(),
        )
    }

    #[test]
    fn gateway_merges_its_sources() {
        let gateway = gateway();
        let user = gateway.schema().get_type("User").unwrap();
        assert_eq!(user.fields.keys().map(|name| name.as_str()).collect::<Vec<_>>(), ["id", "balance", "name"]);
        assert!(gateway.schema().query().is_some());
    }

    #[test]
    fn gateway_reports_conflicts() {
        let err = Gateway::new(
            vec![remote("a", "type User { id: ID! }"), remote("b", "type User { id: Int! }")],
            &MergeOptions::reject_conflicts(),
        )
        .unwrap_err();
        assert!(matches!(err, MergeError::FieldTypeConflicted { .. }));
    }

    #[tokio::test]
    async fn serves_health() {
        let resp = warp::test::request().path("/health").reply(&routes(gateway())).await;
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.body(), "\"healthy\"");
    }

    #[tokio::test]
    async fn serves_merged_sdl() {
        let gateway = gateway();
        let resp = warp::test::request()
            .path("/schema")
            .reply(&routes(gateway.clone()))
            .await;
        assert_eq!(resp.status(), 200);
        assert_eq!(std::str::from_utf8(resp.body()).unwrap(), gateway.sdl());
        assert!(gateway.sdl().contains("type User {\n  id: ID!\n  balance: Int\n  name: String\n}\n"));
    }

    #[tokio::test]
    async fn serves_upstreams() {
        let resp = warp::test::request().path("/services").reply(&routes(gateway())).await;
        assert_eq!(resp.status(), 200);
        let upstreams: serde_json::Value = serde_json::from_slice(resp.body()).unwrap();
        assert_eq!(
            upstreams,
            serde_json::json!([
                { "name": "users", "url": "http://users:8080/graphql" },
                { "name": "accounts", "url": "http://accounts:8080/graphql" },
            ])
        );
    }

    #[tokio::test]
    async fn unknown_path_is_rejected() {
        let resp = warp::test::request().path("/graphql").reply(&routes(gateway())).await;
        assert_eq!(resp.status(), 404);
    }
}
