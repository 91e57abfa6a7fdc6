pub mod answer;
pub mod category;
pub mod post;
pub mod quiz;
pub mod token;
pub mod user;

pub use answer::Answer;
pub use category::Category;
pub use post::Post;
pub use quiz::Quiz;
pub use token::Token;
pub use user::User;
