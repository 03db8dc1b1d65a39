//! Disposable Neo4j for writer tests, behind the `test-utils` feature.

use testcontainers::{
    core::{ContainerPort, WaitFor},
    runners::AsyncRunner,
    ContainerAsync, GenericImage, ImageExt,
};

use crate::{GraphClient, Neo4jSettings};

const BOLT_PORT: u16 = 7687;
const PASSWORD: &str = "tgn-test-password";

/// Starts Neo4j and connects to it. Keep the container alive for as long as
/// the client is used; dropping it stops the database.
pub async fn neo4j_container() -> (ContainerAsync<GenericImage>, GraphClient) {
    let container = GenericImage::new("neo4j", "5.25.1")
        .with_exposed_port(ContainerPort::Tcp(BOLT_PORT))
        .with_wait_for(WaitFor::message_on_stdout("Started."))
        .with_env_var("NEO4J_AUTH", format!("neo4j/{PASSWORD}"))
        .start()
        .await
        .expect("neo4j container should start");

    let port = container
        .get_host_port_ipv4(BOLT_PORT)
        .await
        .expect("bolt port should be mapped");

    let settings = Neo4jSettings {
        uri: format!("bolt://127.0.0.1:{port}"),
        user: "neo4j".into(),
        password: PASSWORD.into(),
    };
    let client = GraphClient::connect(&settings)
        .await
        .expect("neo4j should accept connections");

    (container, client)
}
