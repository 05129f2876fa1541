//! Carts service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::carts::{
        errors::CartsServiceError,
        models::{Cart, CartFee, CartUuid, DiscountLineUpdate, NewCart, NewCartFee},
        repositories::{PgCartFeesRepository, PgCartsRepository},
    },
};

#[derive(Debug, Clone)]
pub struct PgCartsService {
    db: Db,
    carts_repository: PgCartsRepository,
    fees_repository: PgCartFeesRepository,
}

impl PgCartsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            carts_repository: PgCartsRepository::new(),
            fees_repository: PgCartFeesRepository::new(),
        }
    }
}

#[async_trait]
impl CartsService for PgCartsService {
    async fn get_cart(&self, cart: CartUuid) -> Result<Cart, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let mut record = self.carts_repository.get_cart(&mut tx, cart).await?;
        let fees = self.fees_repository.get_cart_fees(&mut tx, cart).await?;

        tx.commit().await?;

        record.fees.extend(fees);

        Ok(record)
    }

    async fn create_cart(&self, cart: NewCart) -> Result<Cart, CartsServiceError> {
        if cart.subtotal < 0 {
            return Err(CartsServiceError::InvalidData);
        }

        let mut tx = self.db.begin().await?;

        let created = self.carts_repository.create_cart(&mut tx, cart).await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn delete_cart(&self, cart: CartUuid) -> Result<(), CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let rows_affected = self.carts_repository.delete_cart(&mut tx, cart).await?;

        if rows_affected == 0 {
            return Err(CartsServiceError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }

    async fn add_fee(&self, cart: CartUuid, fee: NewCartFee) -> Result<CartFee, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        self.carts_repository.lock_cart(&mut tx, cart).await?;

        let created = self
            .fees_repository
            .create_cart_fee(&mut tx, cart, fee)
            .await?;

        self.carts_repository.touch_cart(&mut tx, cart).await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn apply_discount(
        &self,
        cart: CartUuid,
        update: DiscountLineUpdate,
    ) -> Result<Vec<CartFee>, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        self.carts_repository.lock_cart(&mut tx, cart).await?;
        self.fees_repository
            .delete_discount_fees(&mut tx, cart, &update.labels)
            .await?;

        if let Some(discount) = update.discount {
            self.fees_repository
                .create_cart_fee(&mut tx, cart, discount)
                .await?;
        }

        self.carts_repository.touch_cart(&mut tx, cart).await?;

        let fees = self.fees_repository.get_cart_fees(&mut tx, cart).await?;

        tx.commit().await?;

        Ok(fees)
    }
}

#[automock]
#[async_trait]
pub trait CartsService: Send + Sync {
    /// Retrieve a single cart with its fee lines.
    async fn get_cart(&self, cart: CartUuid) -> Result<Cart, CartsServiceError>;

    /// Creates a new cart with the given subtotal.
    async fn create_cart(&self, cart: NewCart) -> Result<Cart, CartsServiceError>;

    /// Deletes a cart with the given UUID.
    async fn delete_cart(&self, cart: CartUuid) -> Result<(), CartsServiceError>;

    /// Append a fee line to the cart.
    async fn add_fee(&self, cart: CartUuid, fee: NewCartFee) -> Result<CartFee, CartsServiceError>;

    /// Swap the cart's payment-method discount lines for `update.discount`, leaving other
    /// fees alone. Returns the resulting fee collection.
    async fn apply_discount(
        &self,
        cart: CartUuid,
        update: DiscountLineUpdate,
    ) -> Result<Vec<CartFee>, CartsServiceError>;
}
