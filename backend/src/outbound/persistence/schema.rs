//! Diesel table definitions mirroring `backend/migrations`.

diesel::table! {
    /// Saved code snippets.
    snippets (id) {
        id -> Int8,
        #[max_length = 255]
        title -> Varchar,
        #[max_length = 50]
        language -> Varchar,
        code -> Text,
        description -> Nullable<Text>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Recorded prompt/response pairs, trimmed to the configured retention.
    history (id) {
        id -> Int8,
        prompt -> Text,
        response -> Text,
        #[max_length = 50]
        language -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Single-row options bag; `id` is constrained to 1.
    settings (id) {
        id -> Int2,
        options -> Jsonb,
        updated_at -> Timestamptz,
    }
}

diesel::allow_tables_to_appear_in_same_query!(history, settings, snippets);
