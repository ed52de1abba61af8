//! Store tests over in-memory sqlite.

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use time::{Duration, OffsetDateTime};
    use uuid::Uuid;

    use crate::domain::model::{ItemPatch, Sort, SortDirection, SortField};
    use crate::domain::repo::{ItemFilter, ItemRepository};
    use crate::infra::storage::SeaOrmItemsRepository;
    use crate::test_support::{inmem_db, insert_item, item};

    fn owner_filter(owner_id: Uuid) -> ItemFilter {
        ItemFilter {
            owner_id,
            category: None,
            search: None,
        }
    }

    const SORT_BY_TITLE: Sort = Sort {
        field: SortField::Title,
        direction: SortDirection::Asc,
    };

    #[tokio::test]
    async fn insert_and_find_scoped_round_trip() {
        let db = inmem_db().await;
        let owner = Uuid::now_v7();
        let mut stored = item(owner, "Buy milk");
        stored.description = Some("two liters".to_owned());
        stored.category = Some("errands".to_owned());
        insert_item(&db, &stored).await;

        let repo = SeaOrmItemsRepository::new(db);
        let found = repo.find_scoped(owner, stored.id).await.unwrap().unwrap();
        assert_eq!(found.id, stored.id);
        assert_eq!(found.title, "Buy milk");
        assert_eq!(found.description.as_deref(), Some("two liters"));
        assert_eq!(found.category.as_deref(), Some("errands"));
        assert!(!found.completed);
    }

    #[tokio::test]
    async fn find_scoped_misses_foreign_rows() {
        let db = inmem_db().await;
        let theirs = item(Uuid::now_v7(), "Their item");
        insert_item(&db, &theirs).await;

        let repo = SeaOrmItemsRepository::new(db);
        let found = repo.find_scoped(Uuid::now_v7(), theirs.id).await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn count_and_list_are_scoped_to_the_owner() {
        let db = inmem_db().await;
        let mine = Uuid::now_v7();
        insert_item(&db, &item(mine, "Mine one")).await;
        insert_item(&db, &item(mine, "Mine two")).await;
        insert_item(&db, &item(Uuid::now_v7(), "Someone else's")).await;

        let repo = SeaOrmItemsRepository::new(db);
        let filter = owner_filter(mine);
        assert_eq!(repo.count(&filter).await.unwrap(), 2);

        let rows = repo.list(&filter, SORT_BY_TITLE, 0, 10).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|row| row.owner_id == mine));
    }

    #[tokio::test]
    async fn category_filter_matches_exactly() {
        let db = inmem_db().await;
        let owner = Uuid::now_v7();
        let mut work = item(owner, "Send report");
        work.category = Some("work".to_owned());
        insert_item(&db, &work).await;
        let mut home = item(owner, "Mow lawn");
        home.category = Some("homework".to_owned());
        insert_item(&db, &home).await;

        let repo = SeaOrmItemsRepository::new(db);
        let filter = ItemFilter {
            category: Some("work".to_owned()),
            ..owner_filter(owner)
        };
        let rows = repo.list(&filter, SORT_BY_TITLE, 0, 10).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].title, "Send report");
    }

    #[tokio::test]
    async fn search_matches_substrings_case_insensitively() {
        let db = inmem_db().await;
        let owner = Uuid::now_v7();
        insert_item(&db, &item(owner, "Buy MILK and eggs")).await;
        insert_item(&db, &item(owner, "Walk the dog")).await;

        let repo = SeaOrmItemsRepository::new(db);
        let filter = ItemFilter {
            search: Some("Milk".to_owned()),
            ..owner_filter(owner)
        };
        assert_eq!(repo.count(&filter).await.unwrap(), 1);

        let rows = repo.list(&filter, SORT_BY_TITLE, 0, 10).await.unwrap();
        assert_eq!(rows[0].title, "Buy MILK and eggs");
    }

    #[tokio::test]
    async fn listing_orders_by_the_requested_column() {
        let db = inmem_db().await;
        let owner = Uuid::now_v7();
        for (title, priority) in [("Middling", 3), ("Urgent", 1), ("Someday", 5)] {
            let mut row = item(owner, title);
            row.priority = priority;
            insert_item(&db, &row).await;
        }

        let repo = SeaOrmItemsRepository::new(db);
        let by_priority = Sort {
            field: SortField::Priority,
            direction: SortDirection::Asc,
        };
        let rows = repo
            .list(&owner_filter(owner), by_priority, 0, 10)
            .await
            .unwrap();
        let titles: Vec<_> = rows.iter().map(|row| row.title.as_str()).collect();
        assert_eq!(titles, ["Urgent", "Middling", "Someday"]);

        let descending = Sort {
            direction: SortDirection::Desc,
            ..by_priority
        };
        let rows = repo
            .list(&owner_filter(owner), descending, 0, 10)
            .await
            .unwrap();
        let titles: Vec<_> = rows.iter().map(|row| row.title.as_str()).collect();
        assert_eq!(titles, ["Someday", "Middling", "Urgent"]);
    }

    #[tokio::test]
    async fn offset_and_limit_cut_a_window() {
        let db = inmem_db().await;
        let owner = Uuid::now_v7();
        for title in ["Alpha", "Bravo", "Charlie", "Delta", "Echo"] {
            insert_item(&db, &item(owner, title)).await;
        }

        let repo = SeaOrmItemsRepository::new(db);
        let rows = repo
            .list(&owner_filter(owner), SORT_BY_TITLE, 2, 2)
            .await
            .unwrap();
        let titles: Vec<_> = rows.iter().map(|row| row.title.as_str()).collect();
        assert_eq!(titles, ["Charlie", "Delta"]);
    }

    #[tokio::test]
    async fn update_patches_named_fields_and_stamps_updated_at() {
        let db = inmem_db().await;
        let owner = Uuid::now_v7();
        let mut stored = item(owner, "Draft report");
        stored.description = Some("rough notes".to_owned());
        insert_item(&db, &stored).await;

        let repo = SeaOrmItemsRepository::new(db);
        let stamp = OffsetDateTime::now_utc() + Duration::minutes(5);
        let patch = ItemPatch {
            title: Some("Final report".to_owned()),
            completed: Some(true),
            ..ItemPatch::default()
        };
        let matched = repo.update(owner, stored.id, &patch, stamp).await.unwrap();
        assert!(matched);

        let row = repo.find_scoped(owner, stored.id).await.unwrap().unwrap();
        assert_eq!(row.title, "Final report");
        assert!(row.completed);
        assert_eq!(row.description.as_deref(), Some("rough notes"));
        assert_eq!(row.updated_at, stamp);
    }

    #[tokio::test]
    async fn update_clears_nullable_fields_on_explicit_null() {
        let db = inmem_db().await;
        let owner = Uuid::now_v7();
        let mut stored = item(owner, "Book flights");
        stored.due_date = Some(OffsetDateTime::now_utc() + Duration::days(30));
        stored.category = Some("travel".to_owned());
        insert_item(&db, &stored).await;

        let repo = SeaOrmItemsRepository::new(db);
        let patch = ItemPatch {
            due_date: Some(None),
            category: Some(None),
            ..ItemPatch::default()
        };
        repo.update(owner, stored.id, &patch, OffsetDateTime::now_utc())
            .await
            .unwrap();

        let row = repo.find_scoped(owner, stored.id).await.unwrap().unwrap();
        assert!(row.due_date.is_none());
        assert!(row.category.is_none());
    }

    #[tokio::test]
    async fn update_misses_foreign_rows() {
        let db = inmem_db().await;
        let theirs = item(Uuid::now_v7(), "Their secret");
        insert_item(&db, &theirs).await;

        let repo = SeaOrmItemsRepository::new(db);
        let patch = ItemPatch {
            title: Some("Hijacked".to_owned()),
            ..ItemPatch::default()
        };
        let matched = repo
            .update(Uuid::now_v7(), theirs.id, &patch, OffsetDateTime::now_utc())
            .await
            .unwrap();
        assert!(!matched);

        let row = repo
            .find_scoped(theirs.owner_id, theirs.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(row.title, "Their secret");
    }

    #[tokio::test]
    async fn delete_misses_foreign_rows_then_removes_owned_ones() {
        let db = inmem_db().await;
        let owner = Uuid::now_v7();
        let stored = item(owner, "Ephemeral");
        insert_item(&db, &stored).await;

        let repo = SeaOrmItemsRepository::new(db);
        assert!(!repo.delete(Uuid::now_v7(), stored.id).await.unwrap());
        assert!(repo.delete(owner, stored.id).await.unwrap());
        assert!(repo.find_scoped(owner, stored.id).await.unwrap().is_none());
    }
}
