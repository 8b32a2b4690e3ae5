use async_trait::async_trait;
use common::constants::CARD_NUMBER_RETRY_TIMES;
use common::data_structures::account_manager::{CardDetails, CardSlot};
use common::error_code::{AccountManagerError, BackendError};
use common::utils::math::gen_random_digits;
use models::account_manager::{UserFilter, UserInfoEntity};
use models::{PgLocalCli, PsqlOp};
use tracing::warn;

/// Where already assigned card numbers are looked up.
#[async_trait]
pub trait CardNumberStore {
    async fn is_taken(&mut self, slot: CardSlot, number: &str) -> Result<bool, BackendError>;
}

#[async_trait]
impl CardNumberStore for PgLocalCli<'_> {
    async fn is_taken(&mut self, slot: CardSlot, number: &str) -> Result<bool, BackendError> {
        let used = UserInfoEntity::find(UserFilter::ByCardNumber(slot, number), self).await?;
        Ok(!used.is_empty())
    }
}

/// Draw random numbers of the slot's width until one is free, giving up
/// after a fixed number of attempts.
pub async fn allocate_card_number<S: CardNumberStore + Send>(
    slot: CardSlot,
    store: &mut S,
) -> Result<String, BackendError> {
    for _ in 0..CARD_NUMBER_RETRY_TIMES {
        let candidate = gen_random_digits(slot.digits());
        if !store.is_taken(slot, &candidate).await? {
            return Ok(candidate);
        }
        warn!("card number {} of {:?} already used", candidate, slot);
    }
    Err(AccountManagerError::CardNumberExhausted(slot.digits()))?
}

/// Three fresh numbers. The unique indexes still reject a number raced in by
/// a concurrent signup.
pub async fn gen_card_details<S: CardNumberStore + Send>(
    store: &mut S,
) -> Result<CardDetails, BackendError> {
    Ok(CardDetails {
        card_number1: allocate_card_number(CardSlot::First, store).await?,
        card_number2: allocate_card_number(CardSlot::Second, store).await?,
        card_number3: allocate_card_number(CardSlot::Third, store).await?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::error_code::ErrorCode;

    //reports the first `busy` lookups as taken
    struct FakeStore {
        busy: usize,
        calls: usize,
    }

    #[async_trait]
    impl CardNumberStore for FakeStore {
        async fn is_taken(&mut self, _slot: CardSlot, _number: &str) -> Result<bool, BackendError> {
            self.calls += 1;
            Ok(self.calls <= self.busy)
        }
    }

    #[actix_web::test]
    async fn test_card_number_free_first_try() {
        let mut store = FakeStore { busy: 0, calls: 0 };
        let details = gen_card_details(&mut store).await.unwrap();
        assert_eq!(details.card_number1.len(), 3);
        assert_eq!(details.card_number2.len(), 5);
        assert_eq!(details.card_number3.len(), 2);
        assert_eq!(store.calls, 3);
    }

    #[actix_web::test]
    async fn test_card_number_retries_until_free() {
        let mut store = FakeStore { busy: 3, calls: 0 };
        let number = allocate_card_number(CardSlot::First, &mut store)
            .await
            .unwrap();
        assert_eq!(number.len(), 3);
        assert_eq!(store.calls, 4);
    }

    #[actix_web::test]
    async fn test_card_number_exhausted() {
        let mut store = FakeStore {
            busy: usize::MAX,
            calls: 0,
        };
        let err = allocate_card_number(CardSlot::Third, &mut store)
            .await
            .unwrap_err();
        assert_eq!(err.code(), 500);
        assert_eq!(store.calls, CARD_NUMBER_RETRY_TIMES as usize);
    }
}
