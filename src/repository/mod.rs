pub mod comment;
pub mod post;
pub mod user;

pub use comment::CommentRepository;
pub use post::PostRepository;
pub use user::UserRepository;

use sqlx::MySqlPool;

/// Repository bundle injected into the GraphQL schema.
#[derive(Clone)]
pub struct Repos {
    pub users: UserRepository,
    pub posts: PostRepository,
    pub comments: CommentRepository,
}

impl Repos {
    pub fn new(pool: MySqlPool) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            posts: PostRepository::new(pool.clone()),
            comments: CommentRepository::new(pool),
        }
    }
}
