use crate::domain::ports::TextField;
use std::time::Duration;

/// Appends `text` to `field` one character at a time.
///
/// The first character lands immediately, each following one `delay` after the previous.
/// Nothing is cleared first, so typing into a non-empty field (or typing twice) concatenates.
pub async fn type_effect<F>(field: &F, text: &str, delay: Duration)
where
    F: TextField + ?Sized,
{
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        field.append(ch);
        if chars.peek().is_some() {
            tokio::time::sleep(delay).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemoryField;
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn test_types_one_character_per_tick() {
        let field = MemoryField::new();
        let start = Instant::now();

        type_effect(&field, "Jo", Duration::from_millis(100)).await;

        let mutations = field.mutations();
        assert_eq!(mutations.len(), 2);
        assert_eq!(mutations[0].value, "J");
        assert_eq!(mutations[0].at - start, Duration::ZERO);
        assert_eq!(mutations[1].value, "Jo");
        assert_eq!(mutations[1].at - start, Duration::from_millis(100));
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_mutation_after_last_character() {
        let field = MemoryField::new();
        let typing = tokio::spawn({
            let field = field.clone();
            async move { type_effect(&field, "abc", Duration::from_millis(50)).await }
        });

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(typing.is_finished());
        assert_eq!(field.value(), "abc");
        assert_eq!(field.mutation_count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_text_performs_no_appends() {
        let field = MemoryField::new();
        let start = Instant::now();

        type_effect(&field, "", Duration::from_millis(100)).await;

        assert_eq!(field.mutation_count(), 0);
        assert_eq!(Instant::now(), start);
    }

    #[tokio::test(start_paused = true)]
    async fn test_typing_twice_concatenates() {
        let field = MemoryField::with_value("ab");
        type_effect(&field, "cd", Duration::from_millis(10)).await;
        type_effect(&field, "cd", Duration::from_millis(10)).await;
        assert_eq!(field.value(), "abcdcd");
    }

    #[tokio::test(start_paused = true)]
    async fn test_counts_unicode_scalars_not_bytes() {
        let field = MemoryField::new();
        type_effect(&field, "Zoë 税", Duration::from_millis(1)).await;
        assert_eq!(field.mutation_count(), 5);
        assert_eq!(field.value(), "Zoë 税");
    }
}
