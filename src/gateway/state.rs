use std::sync::Arc;

use crate::embedding::TextEmbedder;
use crate::matcher::CareerCoachMatcher;
use crate::vectordb::VectorIndex;

pub struct HandlerState<E, I>
where
    E: TextEmbedder + 'static,
    I: VectorIndex + 'static,
{
    pub matcher: Arc<CareerCoachMatcher<E, I>>,
}

impl<E, I> Clone for HandlerState<E, I>
where
    E: TextEmbedder + 'static,
    I: VectorIndex + 'static,
{
    fn clone(&self) -> Self {
        Self {
            matcher: Arc::clone(&self.matcher),
        }
    }
}

impl<E, I> HandlerState<E, I>
where
    E: TextEmbedder + 'static,
    I: VectorIndex + 'static,
{
    pub fn new(matcher: CareerCoachMatcher<E, I>) -> Self {
        Self {
            matcher: Arc::new(matcher),
        }
    }
}
