diesel::table! {
    videos (id) {
        id -> Uuid,
        title -> Varchar,
        description -> Nullable<Text>,
        duration -> Nullable<Float8>,
        status -> Varchar,
        created_at -> Timestamp,
        updated_at -> Timestamp,
    }
}
