use mockito::ServerGuard;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, DbBackend, Schema};

use super::TEST_USER_AGENT;
use crate::server::esi::EsiClient;

pub struct TestSetup {
    pub server: ServerGuard,
    pub db: DatabaseConnection,
    pub esi_client: EsiClient,
}

/// Fresh in-memory database with all tables, plus an ESI client pointed at a
/// mock server.
pub async fn test_setup() -> TestSetup {
    let server = mockito::Server::new_async().await;
    let esi_client = EsiClient::with_base_url(TEST_USER_AGENT, &server.url()).unwrap();

    let db = Database::connect("sqlite::memory:").await.unwrap();
    let backend = db.get_database_backend();
    let schema = Schema::new(DbBackend::Sqlite);

    let stmts = vec![
        schema.create_table_from_entity(entity::prelude::EveCharacter),
        schema.create_table_from_entity(entity::prelude::EveCorporation),
        schema.create_table_from_entity(entity::prelude::Location),
        schema.create_table_from_entity(entity::prelude::Pricing),
        schema.create_table_from_entity(entity::prelude::ContractHandler),
        schema.create_table_from_entity(entity::prelude::Contract),
        schema.create_table_from_entity(entity::prelude::ContractNotification),
    ];

    for stmt in stmts {
        db.execute(backend.build(&stmt)).await.unwrap();
    }

    TestSetup {
        server,
        db,
        esi_client,
    }
}
