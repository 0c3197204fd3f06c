//! DDL templates and deterministic constraint/index name synthesis

mod common;

use orm_common::query::QueryDef;
use orm_common::schema::{Column, ColumnType, ObjectName};
use orm_common::{Compiler, Dialect};

fn table() -> ObjectName {
    ObjectName {
        database: Some("TestDb".to_string()),
        schema: Some("TestSchema".to_string()),
        name: "User".to_string(),
    }
}

fn compile(dialect: Dialect, def: &QueryDef) -> String {
    Compiler::new(dialect).compile(def).unwrap()
}

#[test]
fn create_table_per_dialect() {
    let def = QueryDef::CreateTable {
        table: table(),
        columns: vec![
            Column::new("id", ColumnType::Int).auto_increment(),
            Column::new("name", ColumnType::Varchar { length: 50 }),
            Column::new("email", ColumnType::Varchar { length: 100 }).nullable(),
        ],
        primary_key: vec!["id".to_string()],
    };

    assert_eq!(
        compile(Dialect::MySql, &def),
        "CREATE TABLE `TestDb`.`User` (`id` INT NOT NULL AUTO_INCREMENT, \
         `name` VARCHAR(50) NOT NULL, `email` VARCHAR(100) NULL, PRIMARY KEY (`id`))"
    );
    assert_eq!(
        compile(Dialect::SqlServer, &def),
        "CREATE TABLE [TestDb].[TestSchema].[User] ([id] INT NOT NULL IDENTITY(1,1), \
         [name] NVARCHAR(50) NOT NULL, [email] NVARCHAR(100) NULL, \
         CONSTRAINT [PK_User] PRIMARY KEY ([id]))"
    );
    assert_eq!(
        compile(Dialect::Postgres, &def),
        "CREATE TABLE \"TestSchema\".\"User\" (\"id\" INTEGER NOT NULL GENERATED BY DEFAULT AS IDENTITY, \
         \"name\" VARCHAR(50) NOT NULL, \"email\" VARCHAR(100) NULL, \
         CONSTRAINT \"PK_User\" PRIMARY KEY (\"id\"))"
    );
}

#[test]
fn fk_constraint_name_is_deterministic() {
    let def = QueryDef::AddFk {
        table: table(),
        relation: "posts".to_string(),
        columns: vec!["id".to_string()],
        target_table: ObjectName {
            name: "Post".to_string(),
            ..table()
        },
        target_columns: vec!["userId".to_string()],
    };

    let sql = compile(Dialect::MySql, &def);
    assert!(sql.contains("ADD CONSTRAINT `FK_User_posts` FOREIGN KEY (`id`)"), "{}", sql);
    assert!(sql.contains("REFERENCES `TestDb`.`Post` (`userId`)"), "{}", sql);

    let drop = QueryDef::DropFk {
        table: table(),
        relation: "posts".to_string(),
    };
    assert!(compile(Dialect::MySql, &drop).contains("DROP FOREIGN KEY `FK_User_posts`"));
    assert!(compile(Dialect::Postgres, &drop).contains("DROP CONSTRAINT \"FK_User_posts\""));
}

#[test]
fn index_name_joins_columns_in_declared_order() {
    let def = QueryDef::AddIdx {
        table: table(),
        columns: vec!["name".to_string(), "email".to_string()],
    };

    assert_eq!(
        compile(Dialect::MySql, &def),
        "CREATE INDEX `IDX_User_name_email` ON `TestDb`.`User` (`name`, `email`)"
    );

    let drop = QueryDef::DropIdx {
        table: table(),
        columns: vec!["name".to_string(), "email".to_string()],
    };
    assert_eq!(
        compile(Dialect::SqlServer, &drop),
        "DROP INDEX [IDX_User_name_email] ON [TestDb].[TestSchema].[User]"
    );
    assert_eq!(
        compile(Dialect::Postgres, &drop),
        "DROP INDEX \"TestSchema\".\"IDX_User_name_email\""
    );
}

#[test]
fn alter_column_operations() {
    let add = QueryDef::AddColumn {
        table: table(),
        column: Column::new("age", ColumnType::Int).nullable(),
    };
    assert_eq!(
        compile(Dialect::MySql, &add),
        "ALTER TABLE `TestDb`.`User` ADD COLUMN `age` INT NULL"
    );
    assert_eq!(
        compile(Dialect::SqlServer, &add),
        "ALTER TABLE [TestDb].[TestSchema].[User] ADD [age] INT NULL"
    );

    let modify = QueryDef::ModifyColumn {
        table: table(),
        column: Column::new("age", ColumnType::BigInt),
    };
    assert!(compile(Dialect::MySql, &modify).contains("MODIFY COLUMN `age` BIGINT NOT NULL"));
    assert!(compile(Dialect::SqlServer, &modify).contains("ALTER COLUMN [age] BIGINT NOT NULL"));
    assert!(compile(Dialect::Postgres, &modify)
        .contains("ALTER COLUMN \"age\" TYPE BIGINT, ALTER COLUMN \"age\" SET NOT NULL"));

    let rename = QueryDef::RenameColumn {
        table: table(),
        from: "age".to_string(),
        to: "years".to_string(),
    };
    assert_eq!(
        compile(Dialect::Postgres, &rename),
        "ALTER TABLE \"TestSchema\".\"User\" RENAME COLUMN \"age\" TO \"years\""
    );
    assert_eq!(
        compile(Dialect::SqlServer, &rename),
        "EXEC sp_rename '[TestDb].[TestSchema].[User].age', 'years', 'COLUMN'"
    );
}

#[test]
fn primary_key_operations() {
    let drop = QueryDef::DropPk { table: table() };
    assert_eq!(
        compile(Dialect::MySql, &drop),
        "ALTER TABLE `TestDb`.`User` DROP PRIMARY KEY"
    );
    assert_eq!(
        compile(Dialect::Postgres, &drop),
        "ALTER TABLE \"TestSchema\".\"User\" DROP CONSTRAINT \"PK_User\""
    );

    let add = QueryDef::AddPk {
        table: table(),
        columns: vec!["id".to_string()],
    };
    assert!(compile(Dialect::SqlServer, &add)
        .contains("ADD CONSTRAINT [PK_User] PRIMARY KEY ([id])"));
}

#[test]
fn table_level_operations() {
    let rename = QueryDef::RenameTable {
        from: table(),
        to: "Person".to_string(),
    };
    assert_eq!(
        compile(Dialect::MySql, &rename),
        "RENAME TABLE `TestDb`.`User` TO `Person`"
    );
    assert_eq!(
        compile(Dialect::Postgres, &rename),
        "ALTER TABLE \"TestSchema\".\"User\" RENAME TO \"Person\""
    );

    assert_eq!(
        compile(Dialect::MySql, &QueryDef::Truncate { table: table() }),
        "TRUNCATE TABLE `TestDb`.`User`"
    );
    assert_eq!(
        compile(Dialect::Postgres, &QueryDef::DropTable { table: table() }),
        "DROP TABLE \"TestSchema\".\"User\""
    );
}

#[test]
fn switch_fk_per_dialect() {
    let off = QueryDef::SwitchFk {
        table: table(),
        enabled: false,
    };
    assert_eq!(compile(Dialect::MySql, &off), "SET FOREIGN_KEY_CHECKS = 0");
    assert_eq!(
        compile(Dialect::SqlServer, &off),
        "ALTER TABLE [TestDb].[TestSchema].[User] NOCHECK CONSTRAINT ALL"
    );
    assert_eq!(
        compile(Dialect::Postgres, &off),
        "ALTER TABLE \"TestSchema\".\"User\" DISABLE TRIGGER ALL"
    );

    let on = QueryDef::SwitchFk {
        table: table(),
        enabled: true,
    };
    assert_eq!(compile(Dialect::MySql, &on), "SET FOREIGN_KEY_CHECKS = 1");
    assert!(compile(Dialect::SqlServer, &on).contains("WITH CHECK CHECK CONSTRAINT ALL"));
}

#[test]
fn view_verbs_per_dialect() {
    let (ctx, _) = common::context(Dialect::MySql);
    let def = QueryDef::CreateView {
        view: ObjectName {
            name: "ActiveUsers".to_string(),
            ..table()
        },
        def: ctx.query("User").unwrap().select_def(),
    };

    assert!(compile(Dialect::MySql, &def).starts_with("CREATE OR REPLACE VIEW"));
    assert!(compile(Dialect::Postgres, &def).starts_with("CREATE OR REPLACE VIEW"));
    assert!(compile(Dialect::SqlServer, &def).starts_with("CREATE OR ALTER VIEW"));

    let drop = QueryDef::DropView {
        view: ObjectName {
            name: "ActiveUsers".to_string(),
            ..table()
        },
    };
    assert_eq!(
        compile(Dialect::MySql, &drop),
        "DROP VIEW `TestDb`.`ActiveUsers`"
    );
}

#[test]
fn procedure_verbs_per_dialect() {
    let (ctx, _) = common::context(Dialect::MySql);
    let def = QueryDef::CreateProc {
        proc: ObjectName {
            name: "UsersByName".to_string(),
            ..table()
        },
        params: vec![Column::new("name", ColumnType::Varchar { length: 50 })],
        def: ctx.query("User").unwrap().select_def(),
    };

    assert!(compile(Dialect::MySql, &def).starts_with("CREATE PROCEDURE"));
    assert!(compile(Dialect::SqlServer, &def).contains("@name NVARCHAR(50)"));
    assert!(compile(Dialect::Postgres, &def).contains("LANGUAGE SQL"));

    let drop = QueryDef::DropProc {
        proc: ObjectName {
            name: "UsersByName".to_string(),
            ..table()
        },
    };
    assert!(compile(Dialect::MySql, &drop).starts_with("DROP PROCEDURE"));
    assert!(compile(Dialect::Postgres, &drop).starts_with("DROP FUNCTION"));
}

#[test]
fn schema_operations() {
    let schema = ObjectName {
        database: None,
        schema: None,
        name: "TestSchema".to_string(),
    };

    let clear = QueryDef::ClearSchema {
        schema: schema.clone(),
    };
    assert_eq!(
        compile(Dialect::MySql, &clear),
        "DROP DATABASE IF EXISTS `TestSchema`"
    );
    assert_eq!(
        compile(Dialect::Postgres, &clear),
        "DROP SCHEMA IF EXISTS \"TestSchema\" CASCADE"
    );

    let exists = QueryDef::SchemaExists { schema };
    assert_eq!(
        compile(Dialect::MySql, &exists),
        "SELECT schema_name FROM information_schema.schemata WHERE schema_name = 'TestSchema'"
    );
    assert!(compile(Dialect::SqlServer, &exists).contains("N'TestSchema'"));
}
