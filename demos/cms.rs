//! # CMS Example
//!
//! A small content store built on FlexStore:
//! - Domain entities converted to and from row types
//! - Filters, OR groups, ordering and pagination through params
//! - A custom filter override and a custom param kind
//! - Batch creates and upserts
//!
//! Needs a database: set `FLEXSTORE_CONFIG`, provide `./flexstore.toml`, or set `DATABASE_URL`.

use flexstore::prelude::*;
use serde_json::json;
use std::sync::Arc;

#[model]
#[table(name = "cms_authors")]
pub struct AuthorRow {
    #[primary_key]
    pub id: i64,
    pub handle: String,
    pub display_name: String,
}

impl Entity for AuthorRow {
    type Id = i64;

    fn id(&self) -> i64 {
        self.id
    }
}

#[model]
#[table(name = "cms_articles")]
pub struct ArticleRow {
    #[primary_key]
    pub id: i64,
    #[serde(rename = "AuthorID")]
    pub author_id: i64,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Status")]
    pub status: String,
    #[serde(rename = "Views")]
    pub views: i32,
    #[serde(rename = "DeletedAt")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Entity for ArticleRow {
    type Id = i64;

    fn id(&self) -> i64 {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Status {
    Draft,
    Published,
}

/// Article as the rest of the application sees it
#[derive(Debug, Clone)]
pub struct Article {
    pub id: i64,
    pub author_id: i64,
    pub title: String,
    pub status: Status,
    pub views: i32,
}

impl Entity for Article {
    type Id = i64;

    fn id(&self) -> i64 {
        self.id
    }
}

fn article_converter() -> ManualConverter<Article, ArticleRow> {
    ManualConverter::new(
        |row: ArticleRow| Article {
            id: row.id,
            author_id: row.author_id,
            title: row.title,
            status: if row.status == "published" {
                Status::Published
            } else {
                Status::Draft
            },
            views: row.views,
        },
        |article: Article| ArticleRow {
            id: article.id,
            author_id: article.author_id,
            title: article.title,
            status: match article.status {
                Status::Draft => "draft".to_string(),
                Status::Published => "published".to_string(),
            },
            views: article.views,
            deleted_at: None,
        },
    )
}

/// Title filters match case-insensitively on a substring.
/// `live` hides soft-deleted rows unless its argument is `true`.
fn article_scopes() -> ScopeBuilder<SqlQuery> {
    store_object::generic_store::default_scope_builder::<ArticleRow>()
        .with_custom_filter("Title", |f: &Filter| {
            let pattern = format!("%{}%", f.value.as_str().unwrap_or_default());
            let predicate = Predicate::with_value("title ILIKE ?", json!(pattern));
            let scope: ScopeFn<SqlQuery> =
                Arc::new(move |q: &mut SqlQuery| q.and_where(predicate.clone()));
            Ok(scope)
        })
        .with_handler("live", |builder: &ScopeBuilder<SqlQuery>, param: &Param| {
            let include_deleted = match param {
                Param::Custom(custom) => custom.args.as_bool().unwrap_or(false),
                other => {
                    return Err(LowerError::UnexpectedParam {
                        expected: "live".to_string(),
                        found: other.kind().to_string(),
                    });
                }
            };
            let column = builder.column("DeletedAt").to_string();
            let scope: ScopeFn<SqlQuery> = Arc::new(move |q: &mut SqlQuery| {
                if !include_deleted {
                    q.and_where(Predicate::new(format!("{} IS NULL", column), Vec::new()));
                }
            });
            Ok(scope)
        })
}

async fn connect() -> anyhow::Result<FlexStore> {
    match AppConfig::load() {
        Ok(config) => Ok(FlexStore::from_config(config).await?),
        Err(config_error) => {
            let url = std::env::var("DATABASE_URL").map_err(|_| config_error)?;
            Ok(FlexStore::from_pool(PgPool::connect(&url).await?))
        }
    }
}

async fn create_tables(pool: &PgPool) -> anyhow::Result<()> {
    for statement in [
        "DROP TABLE IF EXISTS cms_articles",
        "DROP TABLE IF EXISTS cms_authors",
        "CREATE TABLE cms_authors (id BIGSERIAL PRIMARY KEY, handle TEXT NOT NULL UNIQUE, \
         display_name TEXT NOT NULL)",
        "CREATE TABLE cms_articles (id BIGSERIAL PRIMARY KEY, \
         author_id BIGINT NOT NULL REFERENCES cms_authors(id), title TEXT NOT NULL, \
         status TEXT NOT NULL, views INTEGER NOT NULL DEFAULT 0, deleted_at TIMESTAMPTZ)",
    ] {
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    println!("📰 FlexStore CMS Example");
    println!("========================");

    let mut flexstore = connect().await?;
    flexstore.health_check().await?;
    create_tables(flexstore.pool()).await?;

    let authors = flexstore.row_store::<AuthorRow>();
    let articles = flexstore
        .generic_store::<Article, ArticleRow, _>(article_converter())
        .with_scope_builder(article_scopes());
    flexstore.register_store("authors", authors)?;
    flexstore.register_store("articles", articles)?;
    println!("Registered stores: {:?}", flexstore.list_stores());

    let authors = flexstore.get_store::<GenericStore<AuthorRow, AuthorRow, IdentityConverter<AuthorRow>>>("authors")?;
    let articles =
        flexstore.get_store::<GenericStore<Article, ArticleRow, ManualConverter<Article, ArticleRow>>>("articles")?;

    // Authors
    let ada = authors
        .upsert(
            AuthorRow {
                id: 0,
                handle: "ada".to_string(),
                display_name: "Ada".to_string(),
            },
            OnConflict::columns(["handle"]).update_columns(["display_name"]),
        )
        .await?;
    println!("✅ Author ada has id {}", ada);

    // Articles in one transaction
    let drafts = [
        ("Getting started with Rust", Status::Published, 1200),
        ("Async Rust in practice", Status::Published, 640),
        ("Notes on lifetimes", Status::Draft, 0),
        ("Query params explained", Status::Draft, 15),
    ];
    articles
        .create_many(
            drafts
                .into_iter()
                .map(|(title, status, views)| Article {
                    id: 0,
                    author_id: ada,
                    title: title.to_string(),
                    status,
                    views,
                })
                .collect(),
        )
        .await?;
    println!("✅ Created {} articles", articles.count(&params![]).await?);

    // Search: custom title filter, OR group and ordering
    let found = articles
        .list(&params![
            filter("Title", "rust"),
            or([
                filter("Status", "published"),
                filter("Views", 10).with_op(Operator::Gt),
            ])?,
            order_by("Views", true),
            paginate(0, 10),
        ])
        .await?;
    println!("\n🔍 Articles mentioning \"rust\":");
    for article in &found {
        println!("   {} ({:?}, {} views)", article.title, article.status, article.views);
    }

    // Full update of one article
    if let Some(mut lifetimes) = articles.get(&params![filter("Title", "lifetimes")]).await? {
        lifetimes.views += 1;
        lifetimes.status = Status::Published;
        let updated = articles.update(lifetimes, &params![]).await?;
        println!("\n📝 Published {} article", updated);
    }

    // Soft delete the remaining drafts, then hide them with the custom param
    sqlx::query("UPDATE cms_articles SET deleted_at = now() WHERE status = 'draft'")
        .execute(flexstore.pool())
        .await?;
    let live = articles.count(&params![custom("live", false)?]).await?;
    let all = articles.count(&params![custom("live", true)?]).await?;
    println!("👀 {} live articles out of {}", live, all);

    let popular = articles
        .exists(&params![
            custom("live", false)?,
            filter("Views", 1000).with_op(Operator::Gte)
        ])
        .await?;
    println!("🔥 Any popular live article: {}", popular);

    // Null filter values are rejected before any SQL is sent
    if let Err(e) = articles.list(&params![filter("DeletedAt", json!(null))]).await {
        println!("⚠️  {}", e);
    }

    let removed = articles.delete(&params![filter("Status", "draft")]).await?;
    println!("🗑️  Removed {} soft-deleted drafts", removed);

    println!("\n🎉 Done");
    Ok(())
}
