pub mod category;
pub mod comment;
pub mod message;
pub mod recipe;
pub mod user;

pub use category::{Category, CategoryRepository};
pub use comment::{Comment, CommentInput, CommentRepository, CommentWithAuthor};
pub use message::{Conversation, Message, MessageInput, MessageRepository, MessageWithSender};
pub use recipe::{
    Recipe, RecipeDetail, RecipeInput, RecipeRepository, RecipeWithAuthor, RecipeWithCategory,
};
pub use user::{Role, User, UserAuth, UserRepository};
