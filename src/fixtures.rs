#[cfg(test)]
pub mod test {
    use std::io::{self, Write};

    use serde::Deserialize;

    use crate::schema::{Field, Schema};
    use crate::types::SourceTable;
    use crate::value::FieldValue;

    /// Synthetic environment, in the shape `std::env::vars()` yields.
    pub fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    pub fn table(pairs: &[(&str, &str)]) -> SourceTable {
        vars(pairs).into_iter().collect()
    }

    // -- Environment ------------------------------------------------------------

    #[derive(Debug, Default, PartialEq)]
    pub struct EnvConfig {
        pub redis_host: String,
        pub redis_secret: String,
        pub redis_db: i64,
        pub workspace: String,
        pub tags: Vec<String>,
        pub ignored: String,
    }

    impl Schema for EnvConfig {
        fn fields(&mut self) -> Vec<Field<'_>> {
            vec![
                Field::new("redis_host", &mut self.redis_host).env("*REDIS_HOST"),
                Field::new("redis_secret", &mut self.redis_secret).env("RESID_SECRET"),
                Field::new("redis_db", &mut self.redis_db).env("REDIS_DB"),
                Field::new("workspace", &mut self.workspace).env("*WORKSPACE"),
                Field::new("tags", &mut self.tags).env("TAG"),
                Field::new("ignored", &mut self.ignored).env("-"),
            ]
        }
    }

    #[derive(Debug, Default, PartialEq)]
    pub struct PrefixConfig {
        pub redis_db: i64,
    }

    impl Schema for PrefixConfig {
        fn fields(&mut self) -> Vec<Field<'_>> {
            vec![Field::new("redis_db", &mut self.redis_db).env("REDIS_DB")]
        }
    }

    // -- Resources --------------------------------------------------------------

    #[derive(Debug, Default, PartialEq)]
    pub struct ResourceConfig {
        pub version: String,
        pub build: u32,
    }

    impl Schema for ResourceConfig {
        fn fields(&mut self) -> Vec<Field<'_>> {
            vec![
                Field::new("version", &mut self.version).resource("*.VERSION"),
                Field::new("build", &mut self.build).resource("BUILD_NUMBER"),
            ]
        }

        fn output(&self, writer: &mut dyn Write) -> Option<io::Result<()>> {
            Some(writeln!(writer, "{}+{}", self.version, self.build))
        }
    }

    // -- Every source at once ---------------------------------------------------

    #[derive(Debug, Default, PartialEq)]
    pub struct DummyConfig {
        pub redis_host: String,
        pub redis_password: String,
        pub redis_db: i64,
        pub redis_pool_size: i64,
        pub workspace: String,
        pub tags: Vec<String>,
        pub version: String,
    }

    impl Schema for DummyConfig {
        fn fields(&mut self) -> Vec<Field<'_>> {
            vec![
                Field::new("redis_host", &mut self.redis_host)
                    .env("REDIS_HOST")
                    .yaml("redisHost")
                    .json("redisHost")
                    .arg("redis-host;the Redis server address and port"),
                Field::new("redis_password", &mut self.redis_password)
                    .env("REDIS_PASSWORD")
                    .yaml("redisPassword")
                    .json("redisPassword")
                    .arg("redis-password;the Redis password"),
                Field::new("redis_db", &mut self.redis_db)
                    .env("REDIS_DB")
                    .yaml("redisDB")
                    .json("redisDB")
                    .arg("redis-db;the Redis database number"),
                Field::new("redis_pool_size", &mut self.redis_pool_size)
                    .env("-")
                    .yaml("redisPoolSize")
                    .json("redisPoolSize"),
                Field::new("workspace", &mut self.workspace)
                    .env("-")
                    .yaml("workspace")
                    .json("workspace")
                    .arg("workspace;the data workspace"),
                Field::new("tags", &mut self.tags).env("TAG"),
                Field::new("version", &mut self.version).resource(".VERSION"),
            ]
        }
    }

    // -- Nested documents -------------------------------------------------------

    #[derive(Debug, Default, PartialEq, Clone, Deserialize)]
    #[serde(default)]
    pub struct DbConfig {
        pub url: Option<String>,
        pub pool_size: usize,
    }

    impl FieldValue for DbConfig {
        fn parse_value(raw: &str) -> Result<Self, String> {
            serde_json::from_str(raw).map_err(|e| e.to_string())
        }
    }

    #[derive(Debug, Default, PartialEq)]
    pub struct NestedConfig {
        pub label: String,
        pub db: DbConfig,
    }

    impl Schema for NestedConfig {
        fn fields(&mut self) -> Vec<Field<'_>> {
            vec![
                Field::new("label", &mut self.label).json("label").toml("label"),
                Field::new("db", &mut self.db)
                    .yaml("db")
                    .json("*db")
                    .toml("db"),
            ]
        }
    }

    // -- Command line -----------------------------------------------------------

    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
    pub enum Role {
        #[default]
        None,
        User,
        Admin,
    }

    /// Unknown role names fall back to `None` instead of failing.
    impl FieldValue for Role {
        fn parse_value(raw: &str) -> Result<Self, String> {
            Ok(match raw {
                "User" => Role::User,
                "Admin" => Role::Admin,
                _ => Role::None,
            })
        }
    }

    #[derive(Debug, Default, PartialEq)]
    pub struct ArgConfig {
        pub redis_host: String,
        pub redis_secret: String,
        pub redis_db: i64,
        pub workspace: String,
        pub role: Role,
        pub verbose: bool,
    }

    impl Schema for ArgConfig {
        fn fields(&mut self) -> Vec<Field<'_>> {
            vec![
                Field::new("redis_host", &mut self.redis_host)
                    .arg("redis-host;the Redis server address and port"),
                Field::new("redis_secret", &mut self.redis_secret)
                    .arg("redis-password;the Redis password"),
                Field::new("redis_db", &mut self.redis_db).arg("redis-db;the Redis database number"),
                Field::new("workspace", &mut self.workspace).arg("*workspace;the data workspace"),
                Field::new("role", &mut self.role).arg("role;the role"),
                Field::new("verbose", &mut self.verbose).arg("verbose;print more"),
            ]
        }
    }
}
