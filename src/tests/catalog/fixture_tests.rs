    use super::*;

    fn catalog() -> FixtureCatalog {
        FixtureCatalog::from_json(include_str!("../../../fixtures/catalog.json"))
            .expect("parse fixture")
    }

    fn ids(values: &[FitmentValue]) -> Vec<u64> {
        let mut out = values.iter().map(|v| v.id.get()).collect::<Vec<_>>();
        out.sort();
        out
    }

    #[test]
    fn first_child_type_is_the_tree_root() -> Result<()> {
        let types = catalog().child_types(&ChildTypesQuery::new(RootTypeId(1), Vec::new()))?;
        assert_eq!(types.len(), 1);
        assert_eq!(types[0].id, FitmentTypeId(1));
        assert_eq!(types[0].label(), "Year");
        assert_eq!(types[0].position, Some(0));
        Ok(())
    }

    #[test]
    fn values_follow_the_upstream_context() -> Result<()> {
        let c = catalog();
        assert_eq!(ids(&c.fitment_values(FitmentTypeId(1), &[])?), vec![9, 10, 11]);
        assert_eq!(
            ids(&c.fitment_values(FitmentTypeId(2), &[SelectionPair::new(1, 10)])?),
            vec![55, 56, 57]
        );
        assert_eq!(
            ids(&c.fitment_values(FitmentTypeId(2), &[SelectionPair::new(1, 11)])?),
            vec![55]
        );
        Ok(())
    }

    #[test]
    fn child_type_branches_on_the_selected_value() -> Result<()> {
        let c = catalog();
        let ford = c.child_types(&ChildTypesQuery::new(
            RootTypeId(1),
            vec![SelectionPair::new(1, 10), SelectionPair::new(2, 55)],
        ))?;
        let tesla = c.child_types(&ChildTypesQuery::new(
            RootTypeId(1),
            vec![SelectionPair::new(1, 10), SelectionPair::new(2, 56)],
        ))?;
        assert_eq!(ford[0].label(), "Model");
        assert_eq!(tesla[0].label(), "Trim");
        Ok(())
    }

    #[test]
    fn unknown_paths_and_leaves_have_no_children() -> Result<()> {
        let c = catalog();
        let leaf = c.child_types(&ChildTypesQuery::new(
            RootTypeId(1),
            vec![
                SelectionPair::new(1, 10),
                SelectionPair::new(2, 55),
                SelectionPair::new(3, 901),
            ],
        ))?;
        assert!(leaf.is_empty());

        let off_tree = c.child_types(&ChildTypesQuery::new(
            RootTypeId(1),
            vec![SelectionPair::new(1, 999)],
        ))?;
        assert!(off_tree.is_empty());

        assert!(c.child_types(&ChildTypesQuery::new(RootTypeId(42), Vec::new()))?.is_empty());
        assert!(c.fitment_values(FitmentTypeId(3), &[])?.is_empty());
        Ok(())
    }
