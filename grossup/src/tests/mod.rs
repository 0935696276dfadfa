
mod walk;
