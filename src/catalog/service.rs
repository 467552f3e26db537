//! Catalog operations: categories, products and their references

use crate::catalog::model::{
    Category, CreateCategoryRequest, CreateProductRequest, Product, ProductView, UpdateCategoryRequest,
    UpdateProductRequest,
};
use crate::core::auth::{Identity, Role, authorize};
use crate::core::error::{ShopError, ShopResult};
use crate::core::service::DataService;
use crate::core::validation::{parse_id, trim, trim_optional, validate_payload};
use crate::core::Entity;
use crate::storage::ObjectStore;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

fn stock_from(raw: i64) -> ShopResult<u32> {
    u32::try_from(raw).map_err(|_| ShopError::invalid_input("stock", "out of range"))
}

/// Categories and products, with the referential checks other modules rely on
#[derive(Clone)]
pub struct CatalogService {
    categories: Arc<dyn DataService<Category>>,
    products: Arc<dyn DataService<Product>>,
    objects: Arc<dyn ObjectStore>,
}

impl CatalogService {
    pub fn new(
        categories: Arc<dyn DataService<Category>>,
        products: Arc<dyn DataService<Product>>,
        objects: Arc<dyn ObjectStore>,
    ) -> Self {
        Self {
            categories,
            products,
            objects,
        }
    }

    // ------------------------------------------------------------------
    // Referential checks
    // ------------------------------------------------------------------

    /// Resolve a caller-supplied category id to an existing category
    pub async fn ensure_category_exists(&self, raw_id: &str) -> ShopResult<Uuid> {
        let id = parse_id(raw_id, "category_id")?;
        if !self.categories.exists(&id).await? {
            return Err(ShopError::not_found(Category::resource_name_singular(), id));
        }
        Ok(id)
    }

    pub async fn product_exists(&self, id: &Uuid) -> ShopResult<bool> {
        Ok(self.products.exists(id).await?)
    }

    /// Current product documents for the given ids; deleted ones are absent
    pub async fn products_by_ids(&self, ids: &[Uuid]) -> ShopResult<HashMap<Uuid, Product>> {
        Ok(self.products.get_many(ids).await?)
    }

    async fn ensure_unique_name(&self, name: &str, except: Option<Uuid>) -> ShopResult<()> {
        let taken = self
            .categories
            .search("name", name)
            .await?
            .into_iter()
            .any(|existing| Some(existing.id) != except);

        if taken {
            return Err(ShopError::Conflict {
                entity: Category::resource_name_singular(),
                field: "name",
                value: name.to_string(),
            });
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Categories
    // ------------------------------------------------------------------

    pub async fn list_categories(&self) -> ShopResult<Vec<Category>> {
        Ok(self.categories.list().await?)
    }

    pub async fn get_category(&self, id: &Uuid) -> ShopResult<Category> {
        self.categories
            .get(id)
            .await?
            .ok_or_else(|| ShopError::not_found(Category::resource_name_singular(), id))
    }

    pub async fn create_category(&self, identity: &Identity, request: CreateCategoryRequest) -> ShopResult<Category> {
        authorize(identity, Role::Admin)?;
        validate_payload(&request)?;

        let name = trim(&request.name);
        self.ensure_unique_name(&name, None).await?;

        let category = self
            .categories
            .create(Category::new(name, trim_optional(request.description)))
            .await?;

        tracing::info!(category_id = %category.id, name = %category.name, "Category created");
        Ok(category)
    }

    pub async fn update_category(
        &self,
        identity: &Identity,
        id: &Uuid,
        request: UpdateCategoryRequest,
    ) -> ShopResult<Category> {
        authorize(identity, Role::Admin)?;
        validate_payload(&request)?;

        let mut category = self.get_category(id).await?;

        if let Some(name) = request.name {
            let name = trim(&name);
            self.ensure_unique_name(&name, Some(category.id)).await?;
            category.name = name;
        }
        if request.description.is_some() {
            category.description = trim_optional(request.description);
        }
        category.touch();

        self.categories
            .update(id, category)
            .await?
            .ok_or_else(|| ShopError::not_found(Category::resource_name_singular(), id))
    }

    /// Delete a category. Products referencing it keep the dangling id and
    /// render with no category.
    pub async fn delete_category(&self, identity: &Identity, id: &Uuid) -> ShopResult<()> {
        authorize(identity, Role::Admin)?;

        if !self.categories.delete(id).await? {
            return Err(ShopError::not_found(Category::resource_name_singular(), id));
        }

        tracing::info!(category_id = %id, "Category deleted");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Products
    // ------------------------------------------------------------------

    async fn join_categories(&self, products: Vec<Product>) -> ShopResult<Vec<ProductView>> {
        let mut ids: Vec<Uuid> = products.iter().map(|p| p.category_id).collect();
        ids.sort();
        ids.dedup();
        let categories = self.categories.get_many(&ids).await?;

        Ok(products
            .into_iter()
            .map(|product| ProductView {
                category: categories.get(&product.category_id).cloned(),
                product,
            })
            .collect())
    }

    pub async fn list_products(&self) -> ShopResult<Vec<ProductView>> {
        let products = self.products.list().await?;
        self.join_categories(products).await
    }

    pub async fn get_product(&self, id: &Uuid) -> ShopResult<ProductView> {
        let product = self
            .products
            .get(id)
            .await?
            .ok_or_else(|| ShopError::not_found(Product::resource_name_singular(), id))?;

        let mut views = self.join_categories(vec![product]).await?;
        views
            .pop()
            .ok_or_else(|| ShopError::not_found(Product::resource_name_singular(), id))
    }

    pub async fn create_product(&self, identity: &Identity, request: CreateProductRequest) -> ShopResult<Product> {
        authorize(identity, Role::Admin)?;
        validate_payload(&request)?;

        let category_id = self.ensure_category_exists(&request.category_id).await?;
        let image_url = match request.image.as_deref() {
            Some(reference) => Some(self.objects.locate(reference).await?),
            None => None,
        };

        let product = Product::new(
            trim(&request.name),
            trim_optional(request.description),
            request.price,
            category_id,
            stock_from(request.stock)?,
            image_url,
        );
        let product = self.products.create(product).await?;

        tracing::info!(product_id = %product.id, category_id = %category_id, "Product created");
        Ok(product)
    }

    /// Apply a partial update. Omitted fields, including the image, keep
    /// their current value.
    pub async fn update_product(
        &self,
        identity: &Identity,
        id: &Uuid,
        request: UpdateProductRequest,
    ) -> ShopResult<Product> {
        authorize(identity, Role::Admin)?;
        validate_payload(&request)?;

        let category_id = match request.category_id.as_deref() {
            Some(raw) => Some(self.ensure_category_exists(raw).await?),
            None => None,
        };

        let mut product = self
            .products
            .get(id)
            .await?
            .ok_or_else(|| ShopError::not_found(Product::resource_name_singular(), id))?;

        if let Some(name) = request.name {
            product.name = trim(&name);
        }
        if request.description.is_some() {
            product.description = trim_optional(request.description);
        }
        if let Some(price) = request.price {
            product.price = price;
        }
        if let Some(category_id) = category_id {
            product.category_id = category_id;
        }
        if let Some(stock) = request.stock {
            product.stock = stock_from(stock)?;
        }
        if let Some(reference) = request.image.as_deref() {
            product.image_url = Some(self.objects.locate(reference).await?);
        }
        product.touch();

        let product = self
            .products
            .update(id, product)
            .await?
            .ok_or_else(|| ShopError::not_found(Product::resource_name_singular(), id))?;

        tracing::info!(product_id = %product.id, "Product updated");
        Ok(product)
    }

    pub async fn delete_product(&self, identity: &Identity, id: &Uuid) -> ShopResult<()> {
        authorize(identity, Role::Admin)?;

        if !self.products.delete(id).await? {
            return Err(ShopError::not_found(Product::resource_name_singular(), id));
        }

        tracing::info!(product_id = %id, "Product deleted");
        Ok(())
    }
}
