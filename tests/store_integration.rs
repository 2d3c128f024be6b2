//! Integration tests for GenericStore against PostgreSQL
//!
//! Run with `DATABASE_URL=postgres://... cargo test -- --ignored`.

use flexstore::prelude::*;
use serde_json::json;

#[model]
#[table(name = "it_articles")]
pub struct ArticleRow {
    #[primary_key]
    pub id: i64,
    pub title: String,
    pub status: String,
    pub views: i32,
    pub author: Option<String>,
}

impl Entity for ArticleRow {
    type Id = i64;

    fn id(&self) -> i64 {
        self.id
    }
}

#[model]
#[table(name = "it_tags")]
pub struct TagRow {
    #[primary_key]
    pub id: i64,
    pub label: String,
    pub uses: i32,
}

impl Entity for TagRow {
    type Id = i64;

    fn id(&self) -> i64 {
        self.id
    }
}

/// Domain view of an article
#[derive(Debug, Clone, PartialEq)]
pub struct Article {
    pub id: i64,
    pub title: String,
    pub published: bool,
}

impl Entity for Article {
    type Id = i64;

    fn id(&self) -> i64 {
        self.id
    }
}

fn article(title: &str, status: &str, views: i32) -> ArticleRow {
    ArticleRow {
        id: 0,
        title: title.to_string(),
        status: status.to_string(),
        views,
        author: Some("ann".to_string()),
    }
}

async fn setup_pool() -> PgPool {
    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for integration tests");

    PgPool::connect(&database_url)
        .await
        .expect("Failed to connect to database")
}

async fn reset_table(pool: &PgPool, table: &str, columns: &str) -> anyhow::Result<()> {
    sqlx::query(&format!("DROP TABLE IF EXISTS {} CASCADE", table))
        .execute(pool)
        .await?;
    sqlx::query(&format!("CREATE TABLE {} ({})", table, columns))
        .execute(pool)
        .await?;
    Ok(())
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_article_crud_and_queries() -> anyhow::Result<()> {
    let pool = setup_pool().await;
    reset_table(
        &pool,
        "it_articles",
        "id BIGSERIAL PRIMARY KEY, title TEXT NOT NULL, status TEXT NOT NULL, \
         views INTEGER NOT NULL, author TEXT",
    )
    .await?;

    let store = FlexStore::from_pool(pool.clone()).row_store::<ArticleRow>();

    let first = store.create(article("intro", "draft", 10)).await?;
    let second = store.create(article("deep dive", "published", 250)).await?;
    let third = store.create(article("recap", "review", 40)).await?;
    assert!(first > 0 && second > first && third > second);

    // OR group AND-ed with a plain filter
    let listed = store
        .list(&params![
            or([filter("status", "draft"), filter("status", json!(["review"]))])?,
            filter("views", 20).with_op(Operator::Gte),
        ])
        .await?;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].title, "recap");

    let ordered = store
        .list(&params![order_by("views", true), paginate(1, 1)])
        .await?;
    assert_eq!(ordered.len(), 1);
    assert_eq!(ordered[0].title, "recap");

    assert_eq!(store.count(&params![]).await?, 3);
    assert_eq!(
        store
            .count(&params![filter("status", "published").with_op(Operator::Neq)])
            .await?,
        2
    );
    assert!(store.exists(&params![filter("title", "intro")]).await?);
    assert!(!store.exists(&params![filter("title", "missing")]).await?);

    let fetched = store.get(&params![ids([second])]).await?;
    assert_eq!(fetched.map(|row| row.title), Some("deep dive".to_string()));
    assert!(store.get(&params![ids([first, third])]).await?.is_some());

    // full update writes NULL, partial update skips it
    let mut changed = article("intro v2", "draft", 11);
    changed.id = first;
    changed.author = None;
    assert_eq!(store.partial_update(changed.clone(), &params![]).await?, 1);
    let row = store.get(&params![ids([first])]).await?.expect("row exists");
    assert_eq!(row.author.as_deref(), Some("ann"));
    assert_eq!(row.title, "intro v2");

    assert_eq!(store.update(changed, &params![]).await?, 1);
    let row = store.get(&params![ids([first])]).await?.expect("row exists");
    assert_eq!(row.author, None);

    // update by filter with no id
    let mut bump = article("archived", "archived", 0);
    bump.author = None;
    let touched = store
        .partial_update(bump, &params![filter("views", 100).with_op(Operator::Lt)])
        .await?;
    assert_eq!(touched, 2);
    assert_eq!(store.count(&params![filter("status", "archived")]).await?, 2);

    // domain store over the same table
    let converter = ManualConverter::new(
        |row: ArticleRow| Article {
            id: row.id,
            title: row.title,
            published: row.status == "published",
        },
        |article: Article| ArticleRow {
            id: article.id,
            title: article.title,
            status: if article.published { "published" } else { "draft" }.to_string(),
            views: 0,
            author: None,
        },
    );
    let articles = FlexStore::from_pool(pool.clone())
        .generic_store::<Article, ArticleRow, _>(converter);
    let published = articles.list(&params![filter("status", "published")]).await?;
    assert_eq!(
        published,
        vec![Article {
            id: second,
            title: "deep dive".to_string(),
            published: true,
        }]
    );

    assert_eq!(store.delete(&params![filter("status", "archived")]).await?, 2);
    assert_eq!(store.count(&params![]).await?, 1);
    assert!(matches!(
        store.delete(&params![]).await,
        Err(StoreError::ValidationError(_))
    ));

    Ok(())
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_tag_batches_and_upserts() -> anyhow::Result<()> {
    let pool = setup_pool().await;
    reset_table(
        &pool,
        "it_tags",
        "id BIGSERIAL PRIMARY KEY, label TEXT NOT NULL UNIQUE, uses INTEGER NOT NULL",
    )
    .await?;

    let store = FlexStore::from_pool(pool.clone())
        .with_store_config(StoreConfig { batch_size: 2 })
        .row_store::<TagRow>();
    assert_eq!(store.batch_size(), 2);

    let tags: Vec<TagRow> = ["rust", "sql", "async", "serde", "tokio"]
        .into_iter()
        .map(|label| TagRow {
            id: 0,
            label: label.to_string(),
            uses: 1,
        })
        .collect();
    store.create_many(tags).await?;
    store.create_many(Vec::new()).await?;
    assert_eq!(store.count(&params![]).await?, 5);

    // a failing batch rolls back the whole call
    let duplicates: Vec<TagRow> = ["fresh", "rust"]
        .into_iter()
        .map(|label| TagRow {
            id: 0,
            label: label.to_string(),
            uses: 1,
        })
        .collect();
    assert!(store.create_many(duplicates).await.is_err());
    assert!(!store.exists(&params![filter("label", "fresh")]).await?);

    let rust = TagRow {
        id: 0,
        label: "rust".to_string(),
        uses: 7,
    };
    let id = store
        .upsert(rust.clone(), OnConflict::columns(["label"]).update_columns(["uses"]))
        .await?;
    let row = store.get(&params![ids([id])]).await?.expect("row exists");
    assert_eq!((row.label.as_str(), row.uses), ("rust", 7));

    store
        .upsert(rust, OnConflict::columns(["label"]).do_nothing())
        .await?;
    assert_eq!(store.count(&params![]).await?, 5);

    store
        .upsert(
            TagRow {
                id: 0,
                label: "sql".to_string(),
                uses: 0,
            },
            OnConflict::columns(["label"]).set("uses", 100),
        )
        .await?;
    assert!(store
        .exists(&params![filter("label", "sql"), filter("uses", 100)])
        .await?);

    let grouped = store
        .count(&params![select(["uses"]), group_by(["uses"])])
        .await?;
    assert_eq!(grouped, 3);

    Ok(())
}

#[model]
#[table(name = "it_wallets")]
pub struct WalletRow {
    #[primary_key]
    pub id: i64,
    pub owner: String,
    pub balance: i32,
}

impl Entity for WalletRow {
    type Id = i64;

    fn id(&self) -> i64 {
        self.id
    }
}

#[model]
#[table(name = "it_pockets")]
pub struct PocketRow {
    #[primary_key]
    pub id: i64,
    pub owner: String,
    pub balance: i32,
}

impl Entity for PocketRow {
    type Id = i64;

    fn id(&self) -> i64 {
        self.id
    }
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_locked_read_and_update_share_a_transaction() -> anyhow::Result<()> {
    let pool = setup_pool().await;
    reset_table(
        &pool,
        "it_wallets",
        "id BIGSERIAL PRIMARY KEY, owner TEXT NOT NULL, balance INTEGER NOT NULL",
    )
    .await?;

    let flexstore = FlexStore::from_pool(pool.clone());
    let wallets = flexstore.row_store::<WalletRow>();
    let id = wallets
        .create(WalletRow {
            id: 0,
            owner: "ann".to_string(),
            balance: 100,
        })
        .await?;

    let scope = flexstore.write_scope();
    let scoped = wallets.in_scope(&scope);

    scope.begin().await?;
    let result: Result<u64, StoreError> = async {
        let mut wallet = scoped
            .get(&params![ids([id]), lock_for_update()])
            .await?
            .expect("wallet exists");

        // the row lock is held by the scope, so another session cannot take it
        let contended = sqlx::query("SELECT id FROM it_wallets WHERE id = $1 FOR UPDATE NOWAIT")
            .bind(id)
            .fetch_optional(&pool)
            .await;
        assert!(contended.is_err());

        wallet.balance -= 30;
        scoped.update(wallet, &params![]).await
    }
    .await;
    assert_eq!(result.as_ref().ok(), Some(&1));

    // uncommitted until the scope ends
    let outside = wallets.get(&params![ids([id])]).await?.expect("wallet exists");
    assert_eq!(outside.balance, 100);

    scope.end(&result).await?;
    assert_eq!(scope.level().await, 0);
    let committed = wallets.get(&params![ids([id])]).await?.expect("wallet exists");
    assert_eq!(committed.balance, 70);

    Ok(())
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_nested_scope_failure_rolls_back_outer_scope() -> anyhow::Result<()> {
    let pool = setup_pool().await;
    reset_table(
        &pool,
        "it_pockets",
        "id BIGSERIAL PRIMARY KEY, owner TEXT NOT NULL, balance INTEGER NOT NULL",
    )
    .await?;

    let flexstore = FlexStore::from_pool(pool);
    let pockets = flexstore.row_store::<PocketRow>();
    let scope = flexstore.write_scope();
    let scoped = pockets.in_scope(&scope);

    scope.begin().await?;
    let created = scoped
        .create(PocketRow {
            id: 0,
            owner: "bob".to_string(),
            balance: 5,
        })
        .await;
    assert!(created.is_ok());

    scope.begin().await?;
    assert_eq!(scope.level().await, 2);
    let inner = scoped.delete(&params![]).await;
    assert!(inner.is_err());
    scope.end(&inner).await?;
    assert_eq!(scope.level().await, 1);

    // batches join the open transaction
    let batch = vec![
        PocketRow {
            id: 0,
            owner: "cy".to_string(),
            balance: 1,
        },
        PocketRow {
            id: 0,
            owner: "di".to_string(),
            balance: 2,
        },
    ];
    scoped.create_many(batch).await?;
    assert_eq!(scoped.count(&params![]).await?, 3);

    let outer = scope.end(&created).await;
    assert!(matches!(outer, Err(StoreError::RolledBack)));
    assert_eq!(pockets.count(&params![]).await?, 0);

    Ok(())
}
