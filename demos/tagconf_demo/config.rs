//! Configuration record for the tagconf demo application.
//!
//! Every field carries one tag per source it can come from:
//!
//! | Field        | env             | yaml            | arg            | resource   |
//! |--------------|-----------------|-----------------|----------------|------------|
//! | `redis_host` | `REDIS_HOST`    | `redisHost`     | `--redis-host` |            |
//! | `redis_db`   | `REDIS_DB`      | `redisDB`       | `--redis-db`   |            |
//! | `pool_size`  |                 | `redisPoolSize` |                |            |
//! | `workspace`  |                 | `workspace`     | `--workspace`  |            |
//! | `tags`       | `TAG`           |                 |                |            |
//! | `role`       | `ROLE`          |                 | `--role`       |            |
//! | `verbose`    |                 |                 | `--verbose`    |            |
//! | `version`    |                 |                 |                | `.VERSION` |

use std::io::{self, Write};

use serde::Deserialize;
use tagconf::{Field, FieldValue, Schema};

/// Access level, to show a custom field type.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum Role {
    #[default]
    Guest,
    User,
    Admin,
}

impl FieldValue for Role {
    fn parse_value(raw: &str) -> Result<Self, String> {
        match raw {
            "Guest" => Ok(Role::Guest),
            "User" => Ok(Role::User),
            "Admin" => Ok(Role::Admin),
            other => Err(format!("unknown role '{other}' (expected Guest, User or Admin)")),
        }
    }
}

#[derive(Debug, Default)]
pub struct DemoConfig {
    pub redis_host: String,
    pub redis_db: i64,
    pub pool_size: usize,
    pub workspace: String,
    pub tags: Vec<String>,
    pub role: Role,
    pub verbose: bool,
    pub version: String,
}

impl Schema for DemoConfig {
    fn fields(&mut self) -> Vec<Field<'_>> {
        vec![
            Field::new("redis_host", &mut self.redis_host)
                .env("REDIS_HOST")
                .yaml("redisHost")
                .arg("redis-host;the Redis server address and port"),
            Field::new("redis_db", &mut self.redis_db)
                .env("REDIS_DB")
                .yaml("redisDB")
                .arg("redis-db;the Redis database number"),
            Field::new("pool_size", &mut self.pool_size).yaml("redisPoolSize"),
            Field::new("workspace", &mut self.workspace)
                .yaml("workspace")
                .arg("*workspace;the data workspace"),
            Field::new("tags", &mut self.tags).env("TAG"),
            Field::new("role", &mut self.role)
                .env("ROLE")
                .arg("role;access level (Guest, User, Admin)"),
            Field::new("verbose", &mut self.verbose).arg("verbose;print every field"),
            Field::new("version", &mut self.version).resource(".VERSION"),
        ]
    }

    fn output(&self, writer: &mut dyn Write) -> Option<io::Result<()>> {
        if self.verbose {
            // Fall through to the plain field dump.
            return None;
        }
        Some(writeln!(
            writer,
            "{} ({:?}) -> {} db {}",
            self.workspace, self.role, self.redis_host, self.redis_db
        ))
    }
}
