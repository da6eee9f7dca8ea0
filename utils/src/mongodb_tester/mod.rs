use std::thread;

use mongodb::Database;
use tokio::runtime::Runtime;

/// spins up a uniquely named database per test and drops it afterwards
pub struct MongoDbTester {
    server_url: String,
    dbname: String,
}

impl MongoDbTester {
    pub async fn new(host: &str, port: u16, user: &str, password: &str) -> MongoDbTester {
        let server_url = match (user.is_empty(), password.is_empty()) {
            (true, _) => format!("mongodb://{}:{}", host, port),
            (false, true) => format!("mongodb://{}@{}:{}", user, host, port),
            (false, false) => format!("mongodb://{}:{}@{}:{}", user, password, host, port),
        };
        MongoDbTester {
            server_url,
            dbname: format!("test_{}", uuid::Uuid::new_v4()),
        }
    }

    pub async fn database(&self) -> Database {
        mongodb::Client::with_uri_str(&self.server_url)
            .await
            .unwrap()
            .database(&self.dbname)
    }
}

impl Drop for MongoDbTester {
    fn drop(&mut self) {
        let server_url = self.server_url.clone();
        let dbname = self.dbname.clone();
        thread::spawn(move || {
            Runtime::new().unwrap().block_on(async move {
                let client = mongodb::Client::with_uri_str(server_url).await.unwrap();
                if let Err(e) = client.database(&dbname).drop(None).await {
                    println!("drop database error: {}", e);
                }
            });
        })
        .join()
        .unwrap();
    }
}
