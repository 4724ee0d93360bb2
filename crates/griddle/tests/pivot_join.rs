use griddle::{CreatePolicy, Database, HasMany, Query, Record};
use griddle_driver_sqlite::Sqlite;

#[derive(Record, Debug, Clone, PartialEq)]
#[table("posts")]
struct Post {
    id: i64,
    title: String,
    tags: HasMany<Tag>,
}

#[derive(Record, Debug, Clone, PartialEq)]
#[table("tags")]
struct Tag {
    id: i64,
    label: String,
}

#[derive(Record, Debug, Clone, PartialEq)]
#[table("post_tags")]
struct PostTag {
    post_id: i64,
    tag_id: i64,
}

fn setup() -> Database {
    let mut db = Database::connect(&Sqlite::in_memory()).unwrap();
    db.create_table::<Post>(CreatePolicy::new()).unwrap();
    db.create_table::<PostTag>(CreatePolicy::new()).unwrap();
    db
}

fn post(id: i64, title: &str) -> Post {
    Post {
        id,
        title: title.to_owned(),
        tags: HasMany::default(),
    }
}

fn tag(id: i64, label: &str) -> Tag {
    Tag {
        id,
        label: label.to_owned(),
    }
}

fn link(post_id: i64, tag_id: i64) -> PostTag {
    PostTag { post_id, tag_id }
}

fn seed(db: &mut Database) {
    Query::<Post>::table()
        .insert(db, &[post(1, "first"), post(2, "second")])
        .unwrap();
    Query::<Tag>::table()
        .insert(db, &[tag(10, "rust"), tag(11, "sql"), tag(12, "orm")])
        .unwrap();
    Query::<PostTag>::table()
        .insert(
            db,
            &[link(1, 10), link(1, 11), link(2, 11), link(2, 12)],
        )
        .unwrap();
}

#[test]
fn pivot_join_resolves_through_the_intermediary() {
    let mut db = setup();
    seed(&mut db);

    let rows = Query::<Post>::table()
        .order(Post::fields().id().asc())
        .join_through(
            Post::fields().tags(),
            Post::fields().id(),
            PostTag::fields().post_id(),
            Tag::fields().id(),
            PostTag::fields().tag_id(),
        )
        .select(&mut db)
        .unwrap();

    let labels = |post: &Post| -> Vec<String> {
        post.tags
            .get()
            .unwrap()
            .iter()
            .map(|t| t.label.clone())
            .collect()
    };

    assert_eq!(labels(&rows[0]), vec!["rust", "sql"]);
    assert_eq!(labels(&rows[1]), vec!["sql", "orm"]);
}

#[test]
fn duplicate_pivot_rows_produce_distinct_children() {
    let mut db = setup();
    seed(&mut db);
    // A second identical link must not duplicate the tag.
    Query::<PostTag>::table()
        .insert(&mut db, &[link(1, 10)])
        .unwrap();

    let rows = Query::<Post>::table()
        .join_through(
            Post::fields().tags(),
            Post::fields().id(),
            PostTag::fields().post_id(),
            Tag::fields().id(),
            PostTag::fields().tag_id(),
        )
        .filter(Post::fields().id().eq(1i64))
        .select(&mut db)
        .unwrap();

    let tags = rows[0].tags.get().unwrap();
    assert_eq!(tags.len(), 2);
}

#[test]
fn pivot_join_with_child_ordering_and_predicate() {
    let mut db = setup();
    seed(&mut db);

    let rows = Query::<Post>::table()
        .join_through(
            Post::fields().tags(),
            Post::fields().id(),
            PostTag::fields().post_id(),
            Tag::fields().id(),
            PostTag::fields().tag_id(),
        )
        .order(Tag::fields().label().desc())
        .filter(Tag::fields().label().ne("orm"))
        .select(&mut db)
        .unwrap();

    let labels: Vec<&str> = rows
        .iter()
        .find(|p| p.id == 1)
        .unwrap()
        .tags
        .get()
        .unwrap()
        .iter()
        .map(|t| t.label.as_str())
        .collect();
    assert_eq!(labels, vec!["sql", "rust"]);
}

#[test]
fn unlinked_post_gets_empty_tag_set() {
    let mut db = setup();
    Query::<Post>::table()
        .insert(&mut db, &[post(5, "lonely")])
        .unwrap();

    let rows = Query::<Post>::table()
        .join_through(
            Post::fields().tags(),
            Post::fields().id(),
            PostTag::fields().post_id(),
            Tag::fields().id(),
            PostTag::fields().tag_id(),
        )
        .select(&mut db)
        .unwrap();

    assert_eq!(rows[0].tags.get(), Some(&[][..]));
}
