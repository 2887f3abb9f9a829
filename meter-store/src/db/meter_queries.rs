use sqlx::{Executor, Sqlite};

use crate::domain::{Meter, MeterId};

pub(crate) async fn insert<'e, E>(executor: E, label: &str) -> Result<Meter, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, Meter>(
        r#"
        INSERT INTO meter (label)
        VALUES (?)
        RETURNING id, label
        "#,
    )
    .bind(label)
    .fetch_one(executor)
    .await
}

pub(crate) async fn find<'e, E>(executor: E, id: MeterId) -> Result<Option<Meter>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, Meter>(
        r#"
        SELECT id, label
        FROM meter
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await
}

pub(crate) async fn all<'e, E>(executor: E) -> Result<Vec<Meter>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, Meter>(
        r#"
        SELECT id, label
        FROM meter
        ORDER BY id
        "#,
    )
    .fetch_all(executor)
    .await
}

pub(crate) async fn relabel<'e, E>(
    executor: E,
    id: MeterId,
    label: &str,
) -> Result<Option<Meter>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, Meter>(
        r#"
        UPDATE meter
        SET label = ?
        WHERE id = ?
        RETURNING id, label
        "#,
    )
    .bind(label)
    .bind(id)
    .fetch_optional(executor)
    .await
}

pub(crate) async fn delete<'e, E>(executor: E, id: MeterId) -> Result<Option<Meter>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, Meter>(
        r#"
        DELETE FROM meter
        WHERE id = ?
        RETURNING id, label
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await
}
