// src/services/catalog_service.rs

use std::collections::HashMap;

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{CatalogRepository, InventoryRepository},
    models::catalog::{
        BomLineDetail, BomMaterialRow, CostPreview, Product, ProductDetail, ProductOverview,
    },
    services::pricing,
};

// Linha de receita como chega da borda: material + quanto entra por
// unidade do produto.
#[derive(Debug, Clone, Copy)]
pub struct BomLineInput {
    pub material_id: Uuid,
    pub quantity_required: Decimal,
}

#[derive(Clone)]
pub struct CatalogService {
    repo: CatalogRepository,
    inventory_repo: InventoryRepository,
    pool: PgPool,
}

impl CatalogService {
    pub fn new(repo: CatalogRepository, inventory_repo: InventoryRepository, pool: PgPool) -> Self {
        Self {
            repo,
            inventory_repo,
            pool,
        }
    }

    // =========================================================================
    //  LISTAGEM E DETALHE
    // =========================================================================

    // Produtos com custo unitário e capacidade de produção, tudo em
    // três queries fixas independente do tamanho do catálogo.
    pub async fn list_products(
        &self,
        search: Option<&str>,
    ) -> Result<Vec<ProductOverview>, AppError> {
        let products = self.repo.get_all_products(search).await?;
        let bom_lines = self.repo.get_all_bom_lines().await?;
        let stocks: HashMap<Uuid, Decimal> =
            self.repo.get_material_stocks().await?.into_iter().collect();
        let costs = self.material_costs().await?;

        let mut bom_by_product: HashMap<Uuid, Vec<(Uuid, Decimal)>> = HashMap::new();
        for (product_id, material_id, quantity_required) in bom_lines {
            bom_by_product
                .entry(product_id)
                .or_default()
                .push((material_id, quantity_required));
        }

        let overviews = products
            .into_iter()
            .map(|p| {
                let bom = bom_by_product.remove(&p.id).unwrap_or_default();

                let unit_cost = pricing::product_unit_cost(bom.iter().map(|(mat, qty)| {
                    (*qty, costs.get(mat).copied().unwrap_or(Decimal::ZERO))
                }));

                let possible = pricing::possible_quantity(bom.iter().map(|(mat, qty)| {
                    (*qty, stocks.get(mat).copied().unwrap_or(Decimal::ZERO))
                }));

                ProductOverview {
                    id: p.id,
                    name: p.name,
                    unit: p.unit,
                    unit_cost,
                    possible_quantity: possible,
                    materials_count: bom.len() as i64,
                    created_at: p.created_at,
                    updated_at: p.updated_at,
                }
            })
            .collect();

        Ok(overviews)
    }

    pub async fn get_product(&self, id: Uuid) -> Result<ProductDetail, AppError> {
        let product = self
            .repo
            .get_product_by_id(id)
            .await?
            .ok_or(AppError::ProductNotFound)?;

        self.assemble_detail(product).await
    }

    // Custo e capacidade de um produto persistido: exatamente o mesmo
    // caminho de cálculo da prévia e da submissão de pedidos.
    pub async fn get_product_cost(&self, id: Uuid) -> Result<CostPreview, AppError> {
        let detail = self.get_product(id).await?;

        Ok(CostPreview {
            unit_cost: detail.unit_cost,
            possible_quantity: detail.possible_quantity,
            materials: detail.materials,
        })
    }

    // Prévia para uma receita ainda não salva (formulário de criação).
    pub async fn cost_preview(&self, lines: &[BomLineInput]) -> Result<CostPreview, AppError> {
        check_duplicate_materials(lines, &HashMap::new())?;

        let mut materials = Vec::with_capacity(lines.len());
        let mut stocks: HashMap<Uuid, Decimal> = HashMap::new();

        for line in lines {
            let material = self
                .inventory_repo
                .get_material_by_id(line.material_id)
                .await?
                .ok_or(AppError::MaterialNotFound)?;

            let imports = self
                .inventory_repo
                .get_imports_for_material(line.material_id)
                .await?;
            let average_cost = pricing::weighted_average_cost(
                imports.iter().map(|i| (i.quantity, i.unit_price)),
            );

            stocks.insert(material.id, material.current_stock);
            materials.push(BomLineDetail {
                material_id: material.id,
                material_name: material.name,
                unit: material.unit,
                current_stock: material.current_stock,
                quantity_required: line.quantity_required,
                average_cost,
                line_cost: pricing::round_money(line.quantity_required * average_cost),
            });
        }

        let unit_cost = pricing::product_unit_cost(
            materials.iter().map(|l| (l.quantity_required, l.average_cost)),
        );
        let possible_quantity = pricing::possible_quantity(materials.iter().map(|l| {
            (
                l.quantity_required,
                stocks.get(&l.material_id).copied().unwrap_or(Decimal::ZERO),
            )
        }));

        Ok(CostPreview {
            unit_cost,
            possible_quantity,
            materials,
        })
    }

    // =========================================================================
    //  ESCRITA
    // =========================================================================

    pub async fn create_product(
        &self,
        name: &str,
        unit: &str,
        bom: &[BomLineInput],
    ) -> Result<ProductDetail, AppError> {
        let names = self.material_names_for(bom).await?;
        check_duplicate_materials(bom, &names)?;

        let mut tx = self.pool.begin().await?;

        let product = self.repo.create_product(&mut *tx, name, unit).await?;
        for line in bom {
            self.repo
                .insert_bom_line(&mut *tx, product.id, line.material_id, line.quantity_required)
                .await?;
        }

        tx.commit().await?;

        self.assemble_detail(product).await
    }

    // Troca de receita é substitutiva: apaga as linhas antigas e grava
    // as novas na mesma transação.
    pub async fn update_product(
        &self,
        id: Uuid,
        name: Option<&str>,
        unit: Option<&str>,
        bom: Option<&[BomLineInput]>,
    ) -> Result<ProductDetail, AppError> {
        if let Some(lines) = bom {
            let names = self.material_names_for(lines).await?;
            check_duplicate_materials(lines, &names)?;
        }

        let mut tx = self.pool.begin().await?;

        let product = self
            .repo
            .update_product(&mut *tx, id, name, unit)
            .await?
            .ok_or(AppError::ProductNotFound)?;

        if let Some(lines) = bom {
            self.repo.delete_bom_for_product(&mut *tx, id).await?;
            for line in lines {
                self.repo
                    .insert_bom_line(&mut *tx, id, line.material_id, line.quantity_required)
                    .await?;
            }
        }

        tx.commit().await?;

        self.assemble_detail(product).await
    }

    // A receita sai junto; itens de pedido antigos apontando para o
    // produto ficam com a referência nula (snapshot preservado).
    pub async fn delete_product(&self, id: Uuid) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        self.repo.delete_bom_for_product(&mut *tx, id).await?;
        let deleted = self.repo.delete_product(&mut *tx, id).await?;
        if deleted == 0 {
            return Err(AppError::ProductNotFound);
        }

        tx.commit().await?;
        Ok(())
    }

    // =========================================================================
    //  APOIO
    // =========================================================================

    async fn assemble_detail(&self, product: Product) -> Result<ProductDetail, AppError> {
        let bom_rows = self.repo.get_bom_for_product(product.id).await?;
        let costs = self.material_costs().await?;

        let materials: Vec<BomLineDetail> = bom_rows
            .into_iter()
            .map(|row: BomMaterialRow| {
                let average_cost = costs.get(&row.material_id).copied().unwrap_or(Decimal::ZERO);
                BomLineDetail {
                    material_id: row.material_id,
                    material_name: row.material_name,
                    unit: row.unit,
                    current_stock: row.current_stock,
                    quantity_required: row.quantity_required,
                    average_cost,
                    line_cost: pricing::round_money(row.quantity_required * average_cost),
                }
            })
            .collect();

        let unit_cost = pricing::product_unit_cost(
            materials.iter().map(|l| (l.quantity_required, l.average_cost)),
        );

        let stocks: HashMap<Uuid, Decimal> =
            self.repo.get_material_stocks().await?.into_iter().collect();
        let possible_quantity = pricing::possible_quantity(materials.iter().map(|l| {
            (
                l.quantity_required,
                stocks.get(&l.material_id).copied().unwrap_or(Decimal::ZERO),
            )
        }));

        Ok(ProductDetail {
            product,
            unit_cost,
            possible_quantity,
            materials,
        })
    }

    // Custo médio de todos os materiais, a partir do razão inteiro.
    async fn material_costs(&self) -> Result<HashMap<Uuid, Decimal>, AppError> {
        let lots = self.inventory_repo.get_all_import_lots().await?;

        let mut lots_by_material: HashMap<Uuid, Vec<(Decimal, Decimal)>> = HashMap::new();
        for (material_id, quantity, unit_price) in lots {
            lots_by_material
                .entry(material_id)
                .or_default()
                .push((quantity, unit_price));
        }

        Ok(lots_by_material
            .into_iter()
            .map(|(id, lots)| (id, pricing::weighted_average_cost(lots)))
            .collect())
    }

    // Valida que todos os materiais da receita existem e devolve os
    // nomes, para mensagens de erro com nome em vez de id.
    async fn material_names_for(
        &self,
        lines: &[BomLineInput],
    ) -> Result<HashMap<Uuid, String>, AppError> {
        let mut names = HashMap::new();
        for line in lines {
            if names.contains_key(&line.material_id) {
                continue;
            }
            let material = self
                .inventory_repo
                .get_material_by_id(line.material_id)
                .await?
                .ok_or(AppError::MaterialNotFound)?;
            names.insert(material.id, material.name);
        }
        Ok(names)
    }
}

// Um material só pode aparecer uma vez por receita.
fn check_duplicate_materials(
    lines: &[BomLineInput],
    names: &HashMap<Uuid, String>,
) -> Result<(), AppError> {
    let mut seen = std::collections::HashSet::new();
    for line in lines {
        if !seen.insert(line.material_id) {
            let name = names
                .get(&line.material_id)
                .cloned()
                .unwrap_or_else(|| line.material_id.to_string());
            return Err(AppError::DuplicateBomMaterial(name));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn line(material_id: Uuid, qty: Decimal) -> BomLineInput {
        BomLineInput {
            material_id,
            quantity_required: qty,
        }
    }

    #[test]
    fn receita_sem_repeticao_passa() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let lines = [line(a, dec!(2)), line(b, dec!(0.5))];

        assert!(check_duplicate_materials(&lines, &HashMap::new()).is_ok());
    }

    #[test]
    fn material_repetido_e_recusado_com_nome() {
        let a = Uuid::new_v4();
        let lines = [line(a, dec!(2)), line(a, dec!(1))];
        let names = HashMap::from([(a, "Tecido".to_string())]);

        match check_duplicate_materials(&lines, &names) {
            Err(AppError::DuplicateBomMaterial(name)) => assert_eq!(name, "Tecido"),
            other => panic!("esperava DuplicateBomMaterial, veio {other:?}"),
        }
    }

    #[test]
    fn receita_vazia_passa() {
        assert!(check_duplicate_materials(&[], &HashMap::new()).is_ok());
    }
}
