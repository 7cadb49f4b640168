//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `migrations/` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Readers and administrators.
    ///
    /// Users are provisioned outside this service; the catalogue only rewrites
    /// the two comic lists and bumps `revision` on each write.
    users (id) {
        id -> Uuid,
        nickname -> Varchar,
        password_hash -> Text,
        is_admin -> Bool,
        /// Wishlist, in insertion order.
        comics_to_buy -> Array<Uuid>,
        /// Purchase history, in purchase order.
        purchased_comics -> Array<Uuid>,
        /// Optimistic concurrency counter, starting at 1.
        revision -> Int4,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Catalogue entries. `title` is unique and `price` is strictly positive.
    comics (id) {
        id -> Uuid,
        title -> Text,
        publisher -> Text,
        authors -> Array<Text>,
        price -> Float8,
        publish_date -> Date,
        description -> Nullable<Text>,
        link -> Nullable<Text>,
        images -> Array<Text>,
        /// Listing order key, together with `id`.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// One salt pair per user, never updated.
    salts (user_id) {
        user_id -> Uuid,
        salt_1 -> Varchar,
        salt_2 -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(salts -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(comics, salts, users);
